//! Client-side route table

/// One addressable page of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    PdfTools,
    MergePdf,
    SplitPdf,
    CompressPdf,
    PdfToImage,
    ImageToPdf,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::PdfTools,
        Route::MergePdf,
        Route::SplitPdf,
        Route::CompressPdf,
        Route::PdfToImage,
        Route::ImageToPdf,
    ];

    /// Unknown paths fall back to [`Route::Home`].
    pub fn from_path(path: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Route::Home)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::PdfTools => "/pdf-tools",
            Route::MergePdf => "/merge-pdf",
            Route::SplitPdf => "/split-pdf",
            Route::CompressPdf => "/compress-pdf",
            Route::PdfToImage => "/pdf-to-image",
            Route::ImageToPdf => "/image-to-pdf",
        }
    }

    /// Id of the page section shown for this route.
    pub fn page_id(&self) -> &'static str {
        match self {
            Route::Home => "page-home",
            Route::PdfTools => "page-pdf-tools",
            Route::MergePdf => "page-merge-pdf",
            Route::SplitPdf => "page-split-pdf",
            Route::CompressPdf => "page-compress-pdf",
            Route::PdfToImage => "page-pdf-to-image",
            Route::ImageToPdf => "page-image-to-pdf",
        }
    }

    pub fn is_tool(&self) -> bool {
        !matches!(self, Route::Home | Route::PdfTools)
    }

    /// Whether the nav link for `self` is highlighted while `current` is shown.
    pub fn is_nav_active(&self, current: Route) -> bool {
        *self == current || (*self == Route::PdfTools && current.is_tool())
    }
}
