/// Finished media bytes tagged with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl std::fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBlob")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// MIME type without parameters such as `;codecs=...`.
    pub fn essence(&self) -> &str {
        self.mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.essence() {
            "video/webm" => "webm",
            "video/mp4" => "mp4",
            "application/zip" => "zip",
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "text/plain" => "txt",
            _ => "bin",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/blob.rs"]
mod tests;
