/// Fields supplied when publishing a post. Everything is optional here so
/// the aggregate itself can report what is missing.
#[derive(Debug, Clone, Default)]
pub struct NewPostDto {
    /// Reference produced by the media upload collaborator
    pub media_url: Option<String>,
    pub caption: Option<String>,
    pub price: Option<f64>,
}

/// Owner edit of the mutable post fields. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct PostPatchDto {
    pub caption: Option<String>,
    pub price: Option<f64>,
    pub media_url: Option<String>,
}

impl PostPatchDto {
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.price.is_none() && self.media_url.is_none()
    }
}
