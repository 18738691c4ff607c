//! Camera image loading
//!
//! Bytes arrive from the API worker, are decoded and downscaled on a
//! blocking thread, and come back as a ready-to-render protocol. Every load
//! carries the generation of the modal that asked for it; results for a
//! modal that has since closed or changed station are dropped.

use ratatui_image::picker::{Picker, ProtocolType};

use crate::{App, ImageMetadata, ImagePreviewState, ImageUpdate};

/// Camera stills larger than this are not decoded
const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Detect the terminal graphics protocol, then apply the configured override
pub(crate) fn create_picker(protocol: &str) -> Picker {
    let mut picker = match Picker::from_query_stdio() {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("Image preview: Failed to detect terminal: {}", e);
            Picker::from_fontsize((8, 16)) // Fallback font size
        }
    };

    match protocol.to_lowercase().as_str() {
        "auto" => tracing::debug!("Image preview: Auto-detected protocol"),
        "iterm2" => picker.set_protocol_type(ProtocolType::Iterm2),
        "kitty" => picker.set_protocol_type(ProtocolType::Kitty),
        "sixel" => picker.set_protocol_type(ProtocolType::Sixel),
        "halfblocks" => picker.set_protocol_type(ProtocolType::Halfblocks),
        unknown => tracing::warn!(
            "Image preview: Unknown protocol '{}', using auto-detect",
            unknown
        ),
    }

    picker
}

impl App {
    /// Record a load about to start. Returns false when the image is already
    /// loaded (or loading) for this modal.
    pub(crate) fn begin_image_load(&mut self, generation: u64, camera_id: &str, thumbnail: bool) -> bool {
        if self.image_picker.is_none() {
            return false;
        }
        let key = (camera_id.to_string(), thumbnail);
        if let Some((loaded_for, state)) = self.image_states.get(&key) {
            if *loaded_for == generation && !matches!(state, ImagePreviewState::Loading) {
                return false;
            }
        }
        if !self
            .images_in_flight
            .insert((generation, camera_id.to_string(), thumbnail))
        {
            return false;
        }
        self.image_states
            .insert(key, (generation, ImagePreviewState::Loading));
        true
    }

    /// Bytes (or an error) arrived for a camera image
    pub(crate) fn image_bytes_received(
        &mut self,
        station_id: String,
        generation: u64,
        camera_id: String,
        thumbnail: bool,
        bytes: Result<Vec<u8>, String>,
    ) {
        if !self.session.model.is_current_modal(&station_id, generation) {
            tracing::debug!("Dropping image {} for closed modal", camera_id);
            self.images_in_flight
                .remove(&(generation, camera_id, thumbnail));
            return;
        }

        let key = (camera_id, thumbnail);
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Camera image {} failed: {}", key.0, e);
                self.apply_image_update(ImageUpdate {
                    station_id,
                    generation,
                    key,
                    state: ImagePreviewState::Failed {
                        metadata: ImageMetadata {
                            dimensions: None,
                            format: Some(e),
                            file_size: 0,
                        },
                    },
                });
                return;
            }
        };

        let Some(picker) = self.image_picker.clone() else {
            return;
        };
        let tx = self.image_update_tx.clone();
        tokio::spawn(async move {
            let state = match decode_image(bytes, picker).await {
                Ok((protocol, metadata)) => ImagePreviewState::Ready { protocol, metadata },
                Err(metadata) => ImagePreviewState::Failed { metadata },
            };
            let _ = tx.send(ImageUpdate {
                station_id,
                generation,
                key,
                state,
            });
        });
    }

    /// Store a decoded image if its modal is still open
    pub(crate) fn apply_image_update(&mut self, update: ImageUpdate) {
        let ImageUpdate {
            station_id,
            generation,
            key,
            state,
        } = update;
        self.images_in_flight
            .remove(&(generation, key.0.clone(), key.1));

        if !self.session.model.is_current_modal(&station_id, generation) {
            tracing::debug!("Dropping decoded image {} for closed modal", key.0);
            return;
        }

        // Images of earlier modals are never shown again
        self.image_states.retain(|_, (g, _)| *g == generation);
        self.image_states.insert(key, (generation, state));
    }
}

async fn decode_image(
    bytes: Vec<u8>,
    picker: Picker,
) -> Result<(ratatui_image::protocol::StatefulProtocol, ImageMetadata), ImageMetadata> {
    let file_size = bytes.len() as u64;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageMetadata {
            dimensions: None,
            format: Some("Too large".to_string()),
            file_size,
        });
    }

    let img = match tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await {
        Ok(Ok(img)) => img,
        Ok(Err(e)) => {
            return Err(ImageMetadata {
                dimensions: None,
                format: Some(format!("Load error: {}", e)),
                file_size,
            });
        }
        Err(e) => {
            return Err(ImageMetadata {
                dimensions: None,
                format: Some(format!("Task error: {}", e)),
                file_size,
            });
        }
    };

    let dimensions = (img.width(), img.height());
    let format = match img.color() {
        image::ColorType::L8 => "Grayscale 8-bit",
        image::ColorType::Rgb8 => "RGB 8-bit",
        image::ColorType::Rgba8 => "RGBA 8-bit",
        _ => "Other",
    };

    // Pre-downscale large images with adaptive quality/performance balance
    let font_size = picker.font_size();
    let (max_width, max_height) = max_reasonable_size(font_size);

    let processed_img = if img.width() > max_width || img.height() > max_height {
        let scale_factor = (img.width() as f32 / max_width as f32)
            .max(img.height() as f32 / max_height as f32);
        let filter = downscale_filter(scale_factor);
        tracing::debug!(
            "Pre-downscaling {}x{} by {:.2}x using {:?}",
            img.width(),
            img.height(),
            scale_factor,
            filter
        );
        img.resize(max_width, max_height, filter)
    } else {
        img
    };

    let protocol = picker.new_resize_protocol(processed_img);

    Ok((
        protocol,
        ImageMetadata {
            dimensions: Some(dimensions),
            format: Some(format.to_string()),
            file_size,
        },
    ))
}

/// ~200 x 60 cells (a large terminal) with 1.25x headroom
fn max_reasonable_size(font_size: (u16, u16)) -> (u32, u32) {
    (
        200 * font_size.0 as u32 * 5 / 4,
        60 * font_size.1 as u32 * 5 / 4,
    )
}

fn downscale_filter(scale_factor: f32) -> image::imageops::FilterType {
    if scale_factor > 4.0 {
        image::imageops::FilterType::Triangle
    } else if scale_factor > 2.0 {
        image::imageops::FilterType::CatmullRom
    } else {
        image::imageops::FilterType::Lanczos3
    }
}
