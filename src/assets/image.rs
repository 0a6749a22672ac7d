use std::{cell::RefCell, fmt, rc::Rc, sync::Arc};

use crate::foundation::error::{StampError, StampResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> StampResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(StampError::asset(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// A bitmap filled with one premultiplied pixel.
    pub fn solid(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat((width as usize) * (height as usize))),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        crate::assets::decode::unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Pending,
    Ready(Bitmap),
    Failed(String),
}

#[derive(Debug, Default)]
struct ImageSlot {
    src: Option<String>,
    state: LoadState,
}

/// Shared handle to a drawable image that may still be loading.
///
/// Clones share one slot, so every node holding the handle sees the pixels as soon as the
/// image completes. Scenes publish their rendered frames through the same mechanism.
#[derive(Clone, Default)]
pub struct ImageResource(Rc<RefCell<ImageSlot>>);

impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.borrow();
        let state = match &slot.state {
            LoadState::Pending => "pending".to_string(),
            LoadState::Ready(b) => format!("{}x{}", b.width, b.height),
            LoadState::Failed(_) => "failed".to_string(),
        };
        f.debug_struct("ImageResource")
            .field("src", &slot.src)
            .field("state", &state)
            .finish()
    }
}

impl ImageResource {
    /// An image with no source yet; it stays pending until completed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(src: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(ImageSlot {
            src: Some(src.into()),
            state: LoadState::Pending,
        })))
    }

    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self(Rc::new(RefCell::new(ImageSlot {
            src: None,
            state: LoadState::Ready(bitmap),
        })))
    }

    pub fn src(&self) -> Option<String> {
        self.0.borrow().src.clone()
    }

    /// Point the handle at a new source; the old pixels are dropped.
    pub fn set_src(&self, src: impl Into<String>) {
        let mut slot = self.0.borrow_mut();
        slot.src = Some(src.into());
        slot.state = LoadState::Pending;
    }

    /// Publish pixels. Later calls replace earlier ones.
    pub fn complete(&self, bitmap: Bitmap) {
        self.0.borrow_mut().state = LoadState::Ready(bitmap);
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.0.borrow_mut().state = LoadState::Failed(reason.into());
    }

    pub fn state(&self) -> LoadState {
        self.0.borrow().state.clone()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.0.borrow().state, LoadState::Ready(_))
    }

    pub fn bitmap(&self) -> Option<Bitmap> {
        match &self.0.borrow().state {
            LoadState::Ready(b) => Some(b.clone()),
            _ => None,
        }
    }

    /// Intrinsic pixel size once loaded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match &self.0.borrow().state {
            LoadState::Ready(b) => Some((b.width, b.height)),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
