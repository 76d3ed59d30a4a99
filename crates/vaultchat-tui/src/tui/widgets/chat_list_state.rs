//! Scroll state for the transcript view.

/// Row-based scroll position of the message list.
#[derive(Debug, Default)]
pub struct ChatListState {
    /// Current scroll offset (row-based)
    pub offset: usize,
    /// Pending scroll target to resolve during measurement
    scroll_target: Option<ScrollTarget>,
    /// Total content height, measured on the last lowering
    pub total_content_height: usize,
    /// Viewport height, measured on the last lowering
    pub last_viewport_height: u16,
    /// Track if user has manually scrolled away from bottom
    pub user_scrolled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Bottom,
}

impl ChatListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the view to the latest message once the content is measured.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_target = Some(ScrollTarget::Bottom);
        self.user_scrolled = false;
    }

    pub fn scroll_up(&mut self, amount: usize) -> bool {
        self.scroll_target = None;
        let previous = self.offset;
        self.offset = self.offset.saturating_sub(amount);
        self.settle_scroll(previous)
    }

    pub fn scroll_down(&mut self, amount: usize) -> bool {
        self.scroll_target = None;
        let previous = self.offset;
        self.offset = self.offset.saturating_add(amount);
        if let Some(max_offset) = self.max_offset() {
            self.offset = self.offset.min(max_offset);
        }
        self.settle_scroll(previous)
    }

    fn settle_scroll(&mut self, previous: usize) -> bool {
        if self.offset == previous {
            return false;
        }
        self.user_scrolled = self
            .max_offset()
            .is_none_or(|max_offset| self.offset < max_offset);
        true
    }

    pub fn is_at_bottom(&self) -> bool {
        match self.max_offset() {
            None => true,
            Some(max_offset) => !self.user_scrolled || self.offset >= max_offset,
        }
    }

    /// Record the measured sizes and resolve any pending target into an offset.
    pub fn measure(&mut self, total_content_height: usize, viewport_height: u16) {
        self.total_content_height = total_content_height;
        self.last_viewport_height = viewport_height;
        let max_offset = self.max_offset().unwrap_or(0);
        match self.scroll_target.take() {
            Some(ScrollTarget::Bottom) => self.offset = max_offset,
            None if !self.user_scrolled => self.offset = max_offset,
            None => self.offset = self.offset.min(max_offset),
        }
    }

    fn max_offset(&self) -> Option<usize> {
        if self.total_content_height == 0 || self.last_viewport_height == 0 {
            None
        } else {
            Some(
                self.total_content_height
                    .saturating_sub(usize::from(self.last_viewport_height)),
            )
        }
    }
}
