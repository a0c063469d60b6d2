use std::{path::Path, time::Duration};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

const SAMPLE_TEXTS: [(&[&str], &str); 3] = [
    (&["french", "france"], "Bonjour, comment ça va aujourd'hui?"),
    (&["spanish", "spain"], "Hola, ¿cómo estás hoy?"),
    (&["german", "germany"], "Hallo, wie geht es Ihnen heute?"),
];

const FALLBACK_TEXT: &str = "Sample text extracted from your image.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{0} is not an image file")]
    NotAnImage(String),
}

/// Pretends to read text from an image, the result only depends on the file name.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    delay: Duration,
}

impl TextExtractor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        if !is_image(path) {
            return Err(ExtractError::NotAnImage(path.display().to_string()));
        }
        tracing::debug!(path = %path.display(), "extracting text from image");
        tokio::time::sleep(self.delay).await;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let text = SAMPLE_TEXTS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| name.contains(keyword)))
            .map(|(_, text)| *text)
            .unwrap_or(FALLBACK_TEXT);
        Ok(text.to_owned())
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TextExtractor {
        TextExtractor::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn text_follows_the_file_name() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract(Path::new("shots/Trip-To-France.PNG")).await.unwrap(),
            "Bonjour, comment ça va aujourd'hui?"
        );
        assert_eq!(
            extractor.extract(Path::new("spain_menu.jpg")).await.unwrap(),
            "Hola, ¿cómo estás hoy?"
        );
        assert_eq!(
            extractor.extract(Path::new("germany.webp")).await.unwrap(),
            "Hallo, wie geht es Ihnen heute?"
        );
        assert_eq!(
            extractor.extract(Path::new("receipt.jpeg")).await.unwrap(),
            FALLBACK_TEXT
        );
    }

    #[tokio::test]
    async fn non_images_are_rejected() {
        let error = extractor().extract(Path::new("notes.txt")).await.unwrap_err();
        assert_eq!(error, ExtractError::NotAnImage("notes.txt".to_owned()));
        assert!(extractor().extract(Path::new("france")).await.is_err());
    }
}
