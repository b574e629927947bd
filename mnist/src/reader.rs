use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::{debug, warn};
use ndarray::{Array1, ArrayView1};

use crate::{MnistErr, Result};

/// Magic number opening every label file.
pub const LABEL_MAGIC: u32 = 2049;

/// Magic number opening every image file.
pub const IMAGE_MAGIC: u32 = 2051;

/// Largest image, in pixels, a header may announce.
pub const MAX_IMAGE_PIXELS: usize = 1 << 20;

/// Pixels strictly above this intensity are ink.
pub const INK_THRESHOLD: u8 = 50;

const INK: char = '#';
const BLANK: char = ' ';

/// A digit and its binarised image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MnistPair {
    pub label: u8,
    pub image: Array1<f64>,
}

/// Reads label/image pairs lazily from two IDX streams.
///
/// Yields exactly as many pairs as the headers announce, then `None`. The first
/// read failure is yielded as an error and ends the sequence.
pub struct MnistReader<L, I> {
    labels: L,
    images: I,
    rows: usize,
    cols: usize,
    remaining: usize,
    pixels: Vec<u8>,
}

impl MnistReader<BufReader<File>, BufReader<File>> {
    /// Opens a label file and an image file.
    ///
    /// # Arguments
    /// * `labels` - Path to the label file, e.g. `train-labels-idx1-ubyte`.
    /// * `images` - Path to the image file, e.g. `train-images-idx3-ubyte`.
    ///
    /// # Returns
    /// A reader positioned at the first pair, or an error if either file can't be
    /// opened or has a bad header.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(labels: P, images: Q) -> Result<Self> {
        let labels = BufReader::new(File::open(labels)?);
        let images = BufReader::new(File::open(images)?);
        Self::new(labels, images)
    }
}

impl<L: Read, I: Read> MnistReader<L, I> {
    /// Creates a new `MnistReader` and decodes both headers.
    ///
    /// # Returns
    /// An error if a magic number is wrong, if the label and image counts differ,
    /// if the images are larger than `MAX_IMAGE_PIXELS` or if a header is truncated.
    pub fn new(mut labels: L, mut images: I) -> Result<Self> {
        expect_magic(&mut labels, "label", LABEL_MAGIC)?;
        let label_count = read_u32(&mut labels)?;

        expect_magic(&mut images, "image", IMAGE_MAGIC)?;
        let image_count = read_u32(&mut images)?;
        let rows = read_u32(&mut images)?;
        let cols = read_u32(&mut images)?;
        let pixels = (rows as usize)
            .checked_mul(cols as usize)
            .filter(|&pixels| pixels <= MAX_IMAGE_PIXELS)
            .ok_or(MnistErr::ImageTooLarge { rows, cols })?;

        if label_count != image_count {
            return Err(MnistErr::CountMismatch {
                labels: label_count,
                images: image_count,
            });
        }

        debug!(count = label_count, rows = rows, cols = cols; "decoded mnist headers");

        Ok(Self {
            labels,
            images,
            rows: rows as usize,
            cols: cols as usize,
            remaining: label_count as usize,
            pixels: vec![0; pixels],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the amount of pairs left to read.
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn read_pair(&mut self) -> Result<MnistPair> {
        let mut label = [0; 1];
        self.labels.read_exact(&mut label)?;
        self.images.read_exact(&mut self.pixels)?;

        let image = self
            .pixels
            .iter()
            .map(|&p| if p > INK_THRESHOLD { 1.0 } else { 0.0 })
            .collect();

        Ok(MnistPair {
            label: label[0],
            image,
        })
    }
}

impl<L: Read, I: Read> Iterator for MnistReader<L, I> {
    type Item = Result<MnistPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match self.read_pair() {
            Ok(pair) => {
                self.remaining -= 1;
                Some(Ok(pair))
            }
            Err(e) => {
                warn!(remaining = self.remaining; "mnist stream ended early");
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Draws a binary image as text, one line per row, `#` for ink.
///
/// # Arguments
/// * `image` - The row-major pixels, ink above `0.5`.
/// * `rows` - The amount of rows to draw.
/// * `cols` - The width of every row.
pub fn render(image: ArrayView1<f64>, rows: usize, cols: usize) -> String {
    let mut out = String::with_capacity(rows * (cols + 1));

    for row in image.exact_chunks(cols.max(1)).into_iter().take(rows) {
        out.extend(row.iter().map(|&p| if p > 0.5 { INK } else { BLANK }));
        out.push('\n');
    }

    out
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn expect_magic<R: Read>(r: &mut R, file: &'static str, expected: u32) -> Result<()> {
    let got = read_u32(r)?;
    if got != expected {
        return Err(MnistErr::WrongMagic {
            file,
            got,
            expected,
        });
    }

    Ok(())
}
