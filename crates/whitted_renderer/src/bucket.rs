//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use rayon::prelude::*;

use crate::renderer::{Framebuffer, RenderError};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image in row-major order.
pub fn generate_buckets(
    width: u32,
    height: u32,
    bucket_size: u32,
) -> Result<Vec<Bucket>, RenderError> {
    if bucket_size == 0 {
        return Err(RenderError::InvalidBucketSize);
    }

    let mut buckets = Vec::new();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    Ok(buckets)
}

/// Render a single bucket with `shade`.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket<T, F>(bucket: &Bucket, shade: &F) -> Vec<T>
where
    F: Fn(u32, u32) -> T,
{
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(shade(bucket.x + local_x, bucket.y + local_y));
        }
    }
    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult<T> {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel values in row-major order
    pub pixels: Vec<T>,
}

impl<T> BucketResult<T> {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<T>) -> Self {
        Self { bucket, pixels }
    }
}

/// Evaluate `shade` for every pixel of a `width` x `height` frame,
/// rendering buckets in parallel.
///
/// Every pixel is a pure function of its coordinates, so the result does
/// not depend on the bucket size or on scheduling.
pub fn render_frame<T, F>(
    width: u32,
    height: u32,
    bucket_size: u32,
    shade: F,
) -> Result<Framebuffer<T>, RenderError>
where
    T: Copy + Default + Send,
    F: Fn(u32, u32) -> T + Sync,
{
    let buckets = generate_buckets(width, height, bucket_size)?;
    log::debug!(
        "Rendering {}x{} in {} buckets of {} px",
        width,
        height,
        buckets.len(),
        bucket_size
    );

    let results: Vec<BucketResult<T>> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, &shade)))
        .collect();

    let mut frame = Framebuffer::new(width, height);
    for result in results {
        let bucket = result.bucket;
        for (i, value) in result.pixels.into_iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            frame.set(bucket.x + local_x, bucket.y + local_y, value);
        }
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64).unwrap();
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64).unwrap();
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
        assert_eq!(buckets[3], Bucket::new(64, 64, 36, 6, 3));
    }

    #[test]
    fn test_row_major_order() {
        let buckets = generate_buckets(192, 128, 64).unwrap();
        let corners: Vec<(u32, u32)> = buckets.iter().map(|b| (b.x, b.y)).collect();
        assert_eq!(corners, vec![(0, 0), (64, 0), (128, 0), (0, 64), (64, 64), (128, 64)]);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_zero_bucket_size_is_error() {
        assert!(matches!(generate_buckets(10, 10, 0), Err(RenderError::InvalidBucketSize)));
    }

    #[test]
    fn test_render_bucket_row_major() {
        let bucket = Bucket::new(2, 3, 2, 2, 0);
        let pixels = render_bucket(&bucket, &|x, y| (x, y));
        assert_eq!(pixels, vec![(2, 3), (3, 3), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_render_frame_independent_of_bucket_size() {
        let shade = |x: u32, y: u32| x * 1000 + y;
        let reference = render_frame(37, 23, 1024, shade).unwrap();
        for size in [1, 5, 16] {
            let frame = render_frame(37, 23, size, shade).unwrap();
            assert_eq!(frame.pixels(), reference.pixels());
        }
        assert_eq!(reference.get(36, 22), 36 * 1000 + 22);
    }
}
