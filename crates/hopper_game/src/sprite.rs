//! Image selection for entities: facing-aware single images and looping
//! frame strips. Playback here is pure bookkeeping over opaque handles;
//! decoding, scaling and flipping are the renderer's problem.

use crate::services::ImageId;

/// A looping frame strip advanced by a fixed per-update step. The step is a
/// fraction of a frame, so a step of 0.15 shows each frame for roughly
/// seven updates.
#[derive(Debug, Clone)]
pub struct Frames {
    images: Vec<ImageId>,
    cursor: f32,
    step: f32,
    pub ended: bool,
}

impl Frames {
    pub fn new(mut images: Vec<ImageId>, step: f32) -> Self {
        if images.is_empty() {
            log::warn!("frame strip created without images, using placeholder");
            images.push(ImageId::from("missing"));
        }
        Self {
            images,
            cursor: 0.0,
            step,
            ended: false,
        }
    }

    pub fn advance(&mut self) -> &ImageId {
        self.cursor += self.step;
        let mut index = self.cursor as usize;
        self.ended = false;
        if index >= self.images.len() {
            self.ended = true;
            self.cursor = 0.0;
            index = 0;
        }
        &self.images[index]
    }

    pub fn first(&self) -> &ImageId {
        &self.images[0]
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A character skin: an idle pose plus a walk strip, with a facing flag the
/// owner keeps in sync. Returns the handle and whether to mirror it.
#[derive(Debug, Clone)]
pub struct Skin {
    idle: ImageId,
    frames: Frames,
    pub right: bool,
}

impl Skin {
    pub fn new(images: Vec<ImageId>, step: f32, right: bool) -> Self {
        let frames = Frames::new(images, step);
        Self {
            idle: frames.first().clone(),
            frames,
            right,
        }
    }

    pub fn idle(&self) -> &ImageId {
        &self.idle
    }

    /// Current image and mirror flag; `animate` false holds the idle pose.
    pub fn image(&mut self, animate: bool) -> (ImageId, bool) {
        let image = if animate {
            self.frames.advance().clone()
        } else {
            self.idle.clone()
        };
        (image, !self.right)
    }
}
