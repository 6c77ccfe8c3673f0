//! Link formatting configuration

/// Hosts and labels the link rules match against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// URL prefix of item pages rendered as a "view" button
    pub item_url_prefix: String,
    /// Visible label of item page links
    pub item_label: String,
    /// Host substring of shortened image URLs rendered inline
    pub image_host: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            item_url_prefix: "https://nexreality.io/".to_string(),
            item_label: "Click to view".to_string(),
            image_host: "tinyurl.com".to_string(),
        }
    }
}
