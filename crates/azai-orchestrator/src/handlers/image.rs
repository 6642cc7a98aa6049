//! Image generation and edit-in-place.

use super::IMAGE_LABEL;
use crate::UnifiedResult;
use azai_abstraction::{AspectRatio, Attachment, Model, ModelParameters, ModelRequest};
use tracing::{info, warn};

/// Returned when the backend replied without an image.
pub const IMAGE_MISSING_TEXT: &str =
    "I couldn't create an image for that request. Try describing it differently.";

/// Returned when the image call failed.
pub const IMAGE_ERROR_TEXT: &str = "Image generation failed. Please try again in a moment.";

/// Caption used when the backend sends an image with no text.
const IMAGE_DEFAULT_CAPTION: &str = "Here is your image.";

/// Generates an image, or edits `attachment` when it is an image.
pub async fn handle_image(
    model: &dyn Model,
    prompt: &str,
    attachment: Option<&Attachment>,
    aspect_ratio: AspectRatio,
) -> UnifiedResult {
    let source = attachment.filter(|a| a.is_image());
    info!(
        aspect_ratio = %aspect_ratio,
        editing = source.is_some(),
        "Running image handler"
    );

    let request = ModelRequest::new(prompt).with_attachment(source.cloned()).with_parameters(
        ModelParameters { aspect_ratio: Some(aspect_ratio), ..ModelParameters::default() },
    );

    match model.generate(&request).await {
        Ok(response) => match response.image {
            Some(image) => {
                let caption = response.content.trim();
                let text =
                    if caption.is_empty() { IMAGE_DEFAULT_CAPTION.to_string() } else { caption.to_string() };
                UnifiedResult::new(text, IMAGE_LABEL).with_attachment(image)
            }
            None => {
                warn!("Image response carried no inline image");
                UnifiedResult::new(IMAGE_MISSING_TEXT, IMAGE_LABEL)
            }
        },
        Err(e) => {
            warn!(error = %e, "Image generation failed");
            UnifiedResult::new(IMAGE_ERROR_TEXT, IMAGE_LABEL)
        }
    }
}
