//! Page preview navigation

use async_trait::async_trait;

pub const PREVIEW_SCALE: f64 = 1.5;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load PDF. Please ensure it is a valid PDF file.";
pub const RENDER_FAILED_MESSAGE: &str = "Failed to render PDF page.";

/// Pixel size of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Draws one page of a loaded document onto the preview surface.
#[async_trait(?Send)]
pub trait PageRenderer {
    async fn render(&mut self, page: u32, scale: f64) -> Result<Viewport, String>;
}

/// Current page within `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewNavigator {
    current: u32,
    total_pages: u32,
}

impl PreviewNavigator {
    pub fn new(total_pages: u32) -> Self {
        Self {
            current: 1,
            total_pages: total_pages.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Step forward; `Some(page)` when the page changed.
    pub fn next(&mut self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }
        self.current += 1;
        Some(self.current)
    }

    pub fn previous(&mut self) -> Option<u32> {
        if !self.has_previous() {
            return None;
        }
        self.current -= 1;
        Some(self.current)
    }

    /// Jump to `page` if it exists. Jumping to the current page still
    /// asks for a render.
    pub fn go_to(&mut self, page: u32) -> Option<u32> {
        if page == 0 || page > self.total_pages {
            return None;
        }
        self.current = page;
        Some(page)
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total_pages)
    }
}

type PageChanged = Box<dyn FnMut(u32)>;

/// A loaded document shown one page at a time.
///
/// Every navigation renders again; nothing is cached.
pub struct PagePreview<R> {
    renderer: R,
    navigator: PreviewNavigator,
    scale: f64,
    on_page_change: Option<PageChanged>,
}

impl<R: PageRenderer> PagePreview<R> {
    pub fn new(renderer: R, total_pages: u32) -> Self {
        Self {
            renderer,
            navigator: PreviewNavigator::new(total_pages),
            scale: PREVIEW_SCALE,
            on_page_change: None,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn on_page_change(&mut self, callback: impl FnMut(u32) + 'static) {
        self.on_page_change = Some(Box::new(callback));
    }

    pub fn navigator(&self) -> &PreviewNavigator {
        &self.navigator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render the current page.
    pub async fn render_current(&mut self) -> Result<Viewport, String> {
        let page = self.navigator.current();
        self.renderer.render(page, self.scale).await.map_err(|detail| {
            tracing::error!(page, %detail, "preview render failed");
            RENDER_FAILED_MESSAGE.to_string()
        })
    }

    pub async fn next(&mut self) -> Option<Result<Viewport, String>> {
        let page = self.navigator.next()?;
        Some(self.show(page).await)
    }

    pub async fn previous(&mut self) -> Option<Result<Viewport, String>> {
        let page = self.navigator.previous()?;
        Some(self.show(page).await)
    }

    pub async fn go_to(&mut self, page: u32) -> Option<Result<Viewport, String>> {
        let page = self.navigator.go_to(page)?;
        Some(self.show(page).await)
    }

    async fn show(&mut self, page: u32) -> Result<Viewport, String> {
        let rendered = self.render_current().await;
        if let Some(callback) = self.on_page_change.as_mut() {
            callback(page);
        }
        rendered
    }
}
