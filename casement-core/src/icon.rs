//! Conversion of RGBA pixel buffers into native icon and cursor resources.

use std::error::Error;
use std::fmt;

use crate::error::OsError;
use crate::os::{BitmapHandle, DcHandle, DibHeader, IconHandle, IconSpec, OsApi};

pub(crate) const PIXEL_SIZE: usize = 4;

/// An error produced when constructing an [`RgbaImage`] from invalid
/// arguments.
#[derive(Debug)]
pub enum BadImage {
    /// The length of the `rgba` argument isn't divisible by 4, so it can't be
    /// interpreted as 32bpp RGBA pixels.
    ByteCountNotDivisibleBy4 { byte_count: usize },
    /// The number of pixels (`rgba.len() / 4`) doesn't equal
    /// `width * height`. At least one of the arguments is incorrect.
    DimensionsVsPixelCount { width: u32, height: u32, width_x_height: usize, pixel_count: usize },
}

impl fmt::Display for BadImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadImage::ByteCountNotDivisibleBy4 { byte_count } => write!(
                f,
                "The length of the `rgba` argument ({byte_count:?}) isn't divisible by 4, making \
                 it impossible to interpret as 32bpp RGBA pixels.",
            ),
            BadImage::DimensionsVsPixelCount { width, height, width_x_height, pixel_count } => {
                write!(
                    f,
                    "The specified dimensions ({width:?}x{height:?}) don't match the number of \
                     pixels supplied by the `rgba` argument ({pixel_count:?}). For those \
                     dimensions, the expected pixel count is {width_x_height:?}.",
                )
            },
        }
    }
}

impl Error for BadImage {}

/// A packed 8-bit RGBA pixel buffer, used as source data for icons and
/// cursors. Never retained after conversion to a native resource.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RgbaImage {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self, BadImage> {
        if rgba.len() % PIXEL_SIZE != 0 {
            return Err(BadImage::ByteCountNotDivisibleBy4 { byte_count: rgba.len() });
        }
        let pixel_count = rgba.len() / PIXEL_SIZE;
        if pixel_count != (width * height) as usize {
            Err(BadImage::DimensionsVsPixelCount {
                width,
                height,
                width_x_height: (width * height) as usize,
                pixel_count,
            })
        } else {
            Ok(RgbaImage { rgba, width, height })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn buffer(&self) -> &[u8] {
        self.rgba.as_slice()
    }

    fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Whether a native resource is built as an icon or as a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Icon,
    Cursor,
}

/// Select the candidate whose pixel area is nearest `width * height`.
///
/// The first candidate at the minimal distance wins on ties.
pub fn closest_image<'a>(
    images: &'a [RgbaImage],
    width: u32,
    height: u32,
) -> Option<&'a RgbaImage> {
    let target = u64::from(width) * u64::from(height);
    let mut least = u64::MAX;
    let mut closest = None;
    for image in images {
        let diff = image.area().abs_diff(target);
        if diff < least {
            closest = Some(image);
            least = diff;
        }
    }
    closest
}

/// Screen device context held for the duration of one icon build, released
/// on every exit path.
struct ScreenDc<'a> {
    os: &'a dyn OsApi,
    dc: DcHandle,
}

impl<'a> ScreenDc<'a> {
    fn acquire(os: &'a dyn OsApi) -> Result<Self, OsError> {
        let dc = os.acquire_screen_dc()?;
        Ok(ScreenDc { os, dc })
    }

    fn handle(&self) -> DcHandle {
        self.dc
    }
}

impl Drop for ScreenDc<'_> {
    fn drop(&mut self) {
        self.os.release_screen_dc(self.dc);
    }
}

/// Deletes the bitmap on drop unless ownership was transferred to the OS.
struct BitmapGuard<'a> {
    os: &'a dyn OsApi,
    bitmap: Option<BitmapHandle>,
}

impl<'a> BitmapGuard<'a> {
    fn new(os: &'a dyn OsApi, bitmap: BitmapHandle) -> Self {
        BitmapGuard { os, bitmap: Some(bitmap) }
    }

    fn handle(&self) -> BitmapHandle {
        self.bitmap.unwrap()
    }

    fn transfer(mut self) {
        self.bitmap = None;
    }
}

impl Drop for BitmapGuard<'_> {
    fn drop(&mut self) {
        if let Some(bitmap) = self.bitmap {
            self.os.delete_bitmap(bitmap);
        }
    }
}

/// Build a native icon or cursor resource from an RGBA image.
///
/// The pixel buffer is copied into a top-down 32-bit BGRA DIB section
/// (channel order converted, alpha preserved) and combined with a 1-bit mask
/// bitmap and the hotspot into the final resource. Both bitmaps belong to
/// the OS once the resource exists; on any failure every resource acquired
/// so far is released before the error is returned.
pub fn create_native_icon(
    os: &dyn OsApi,
    image: &RgbaImage,
    hotspot_x: u32,
    hotspot_y: u32,
    kind: IconKind,
) -> Result<IconHandle, OsError> {
    let header = DibHeader::top_down_bgra(image.width(), image.height());

    let dc = ScreenDc::acquire(os)?;

    let mut pixels = image.buffer().to_vec();
    for pixel in pixels.chunks_exact_mut(PIXEL_SIZE) {
        pixel.swap(0, 2);
    }

    let color = BitmapGuard::new(os, os.create_color_bitmap(dc.handle(), &header, &pixels)?);
    let mask = BitmapGuard::new(os, os.create_mask_bitmap(image.width(), image.height())?);

    let spec = IconSpec {
        icon: kind == IconKind::Icon,
        hotspot_x,
        hotspot_y,
        mask: mask.handle(),
        color: color.handle(),
    };
    let handle = os.create_icon(&spec)?;

    mask.transfer();
    color.transfer();
    Ok(handle)
}
