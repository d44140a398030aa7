//! Spectrum container: raw transfer buffer, decoded intensities and the
//! calibration they were decoded with.

use crate::decode::Calibration;
use crate::error::{Error, Result};
use crate::registry::Model;

/// Buffer sizes of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrumLayout {
    /// Bytes of one full device transfer, sync bytes included.
    pub raw_len: usize,
    /// Decoded samples.
    pub data_len: usize,
}

impl SpectrumLayout {
    /// Layout for `pixel_count` 16-bit samples plus room for sync bytes.
    pub fn generic(pixel_count: usize) -> Self {
        let raw_len = pixel_count * 2 + 2;
        SpectrumLayout {
            raw_len,
            data_len: raw_len / 2 - 1,
        }
    }
}

/// One acquired spectrum.
///
/// Created by [`Session::create_spectrum`](crate::Session::create_spectrum)
/// and filled by each
/// [`Session::request_spectrum`](crate::Session::request_spectrum). The
/// calibration is fixed for the lifetime of the container.
#[derive(Debug, Clone)]
pub struct Spectrum {
    model: Model,
    pixel_count: usize,
    raw: Vec<u8>,
    data: Vec<f64>,
    calibration: Calibration,
}

impl Spectrum {
    /// Allocate zeroed buffers for `layout`.
    pub(crate) fn allocate(
        model: Model,
        pixel_count: usize,
        layout: SpectrumLayout,
        calibration: Calibration,
    ) -> Result<Self> {
        Ok(Spectrum {
            model,
            pixel_count,
            raw: zeroed(layout.raw_len)?,
            data: zeroed(layout.data_len)?,
            calibration,
        })
    }

    /// Model whose session created this spectrum.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Pixel count reported by the detector.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Raw bytes of the last transfer.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Size of the raw buffer in bytes.
    pub fn raw_len(&self) -> usize {
        self.raw.len()
    }

    /// Decoded intensities of the last acquisition.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of decoded samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Calibration coefficients read when the spectrum was created.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Wavelength in nm of a pixel index.
    pub fn wavelength(&self, pixel: i32) -> f64 {
        self.calibration.wavelength(pixel)
    }

    /// `(wavelength, intensity)` pairs of the decoded samples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.wavelength(i as i32), v))
    }

    /// Zero both buffers.
    pub(crate) fn clear(&mut self) {
        self.raw.fill(0);
        self.data.fill(0.0);
    }

    /// Mutable buffers plus the calibration, for the receive routines.
    pub(crate) fn buffers_mut(&mut self) -> (&mut [u8], &mut [f64], &Calibration) {
        (&mut self.raw, &mut self.data, &self.calibration)
    }
}

fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory(len.saturating_mul(std::mem::size_of::<T>())))?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_layout() {
        let layout = SpectrumLayout::generic(512);
        assert_eq!(layout.raw_len, 1026);
        assert_eq!(layout.data_len, 512);
    }

    #[test]
    fn test_allocate_zeroed() {
        let spectrum = Spectrum::allocate(
            Model::NirQuest512,
            512,
            SpectrumLayout::generic(512),
            Calibration::identity(),
        )
        .unwrap();
        assert_eq!(spectrum.raw_len(), 1026);
        assert_eq!(spectrum.len(), 512);
        assert!(spectrum.raw().iter().all(|&b| b == 0));
        assert!(spectrum.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_out_of_memory() {
        let err = zeroed::<f64>(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory(_)));
    }

    #[test]
    fn test_points_use_calibration() {
        let calibration = Calibration {
            wavelength: [900.0, 0.3, 0.0, 0.0],
            ..Calibration::identity()
        };
        let spectrum = Spectrum::allocate(
            Model::Simulated,
            4,
            SpectrumLayout {
                raw_len: 8,
                data_len: 4,
            },
            calibration,
        )
        .unwrap();
        let points: Vec<_> = spectrum.points().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], (900.0, 0.0));
        assert_eq!(spectrum.wavelength(100), 930.0);
    }
}
