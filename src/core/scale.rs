//! Scale multipliers derived from a part's size and aspect.
//!
//! The axial (Y) dimension scales by `linear * aspect`, the two transverse
//! dimensions by `linear` alone. Every multiplier is computed on access from
//! the stored inputs, so a `ScaleFactors` value can never go stale.

use crate::domain::model::Dimensions;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub size: f32,
    pub old_size: f32,
    pub orig_size: f32,
    pub aspect: f32,
    pub old_aspect: f32,
    pub orig_aspect: f32,
    pub is_first_application: bool,
}

impl ScaleFactors {
    pub fn new(
        current: Dimensions,
        previous: Dimensions,
        orig: Dimensions,
        is_first_application: bool,
    ) -> Self {
        Self {
            size: current.size,
            old_size: previous.size,
            orig_size: orig.size,
            aspect: current.aspect,
            old_aspect: previous.aspect,
            orig_aspect: orig.aspect,
            is_first_application,
        }
    }

    pub fn absolute_linear(&self) -> f32 {
        self.size / self.orig_size
    }

    pub fn absolute_quad(&self) -> f32 {
        let l = self.absolute_linear();
        l * l
    }

    pub fn absolute_cube(&self) -> f32 {
        let l = self.absolute_linear();
        l * l * l
    }

    pub fn absolute_aspect(&self) -> f32 {
        self.aspect / self.orig_aspect
    }

    pub fn relative_linear(&self) -> f32 {
        self.size / self.old_size
    }

    pub fn relative_quad(&self) -> f32 {
        let l = self.relative_linear();
        l * l
    }

    pub fn relative_cube(&self) -> f32 {
        let l = self.relative_linear();
        l * l * l
    }

    pub fn relative_aspect(&self) -> f32 {
        self.aspect / self.old_aspect
    }

    pub fn absolute_vector(&self) -> Vec3 {
        axis_vector(self.absolute_linear(), self.absolute_aspect())
    }

    pub fn relative_vector(&self) -> Vec3 {
        axis_vector(self.relative_linear(), self.relative_aspect())
    }

    /// Maps a vector given in reference geometry to the current geometry.
    pub fn scale_vector(&self, v: Vec3) -> Vec3 {
        v * self.absolute_vector()
    }

    /// Maps a vector given in the previously applied geometry to the current one.
    pub fn scale_vector_relative(&self, v: Vec3) -> Vec3 {
        v * self.relative_vector()
    }

    /// Size change in whole reference units, used for attach node sizes.
    pub fn size_delta(&self) -> f32 {
        self.size - self.orig_size
    }
}

fn axis_vector(linear: f32, aspect: f32) -> Vec3 {
    Vec3::new(linear, linear * aspect, linear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn factors(size: f32, orig_size: f32, aspect: f32, orig_aspect: f32) -> ScaleFactors {
        ScaleFactors::new(
            Dimensions::new(size, aspect),
            Dimensions::new(size, aspect),
            Dimensions::new(orig_size, orig_aspect),
            false,
        )
    }

    #[test]
    fn test_reference_geometry_is_identity() {
        for (size, aspect) in [(1.0, 1.0), (2.5, 0.75), (0.5, 4.0)] {
            let s = factors(size, size, aspect, aspect);
            assert_eq!(s.absolute_linear(), 1.0);
            assert_eq!(s.absolute_quad(), 1.0);
            assert_eq!(s.absolute_cube(), 1.0);
            assert_eq!(s.absolute_aspect(), 1.0);
            assert_eq!(s.absolute_vector(), Vec3::ONE);
        }
    }

    #[test]
    fn test_powers_of_linear() {
        for (size, orig) in [(2.0, 1.0), (3.0, 1.25), (0.625, 2.5)] {
            let s = factors(size, orig, 1.0, 1.0);
            let l = s.absolute_linear();
            assert!((s.absolute_quad() - l * l).abs() < 1e-6);
            assert!((s.absolute_cube() - l * l * l).abs() < 1e-6);
        }
    }

    proptest! {
        #[test]
        fn prop_reference_geometry_is_identity(
            size in 0.01f32..100.0,
            aspect in 0.01f32..100.0,
        ) {
            let s = factors(size, size, aspect, aspect);
            prop_assert_eq!(s.absolute_linear(), 1.0);
            prop_assert_eq!(s.absolute_quad(), 1.0);
            prop_assert_eq!(s.absolute_cube(), 1.0);
            prop_assert_eq!(s.absolute_aspect(), 1.0);
            prop_assert_eq!(s.absolute_vector(), Vec3::ONE);
        }

        #[test]
        fn prop_quad_and_cube_are_powers_of_linear(
            size in 0.01f32..100.0,
            orig in 0.01f32..100.0,
        ) {
            let s = factors(size, orig, 1.0, 1.0);
            let l = f64::from(s.absolute_linear());
            let quad = f64::from(s.absolute_quad());
            let cube = f64::from(s.absolute_cube());
            prop_assert!((quad - l * l).abs() <= 1e-5 * (l * l));
            prop_assert!((cube - l * l * l).abs() <= 1e-5 * (l * l * l));
        }
    }

    #[test]
    fn test_axial_dimension_carries_aspect() {
        let s = factors(2.0, 1.0, 1.5, 1.0);
        assert_eq!(s.absolute_vector(), Vec3::new(2.0, 3.0, 2.0));
        assert_eq!(s.scale_vector(Vec3::new(1.0, 1.0, -1.0)), Vec3::new(2.0, 3.0, -2.0));
    }

    #[test]
    fn test_relative_multipliers_use_previous_state() {
        let s = ScaleFactors::new(
            Dimensions::new(3.0, 2.0),
            Dimensions::new(1.5, 1.0),
            Dimensions::new(1.0, 1.0),
            false,
        );
        assert_eq!(s.relative_linear(), 2.0);
        assert_eq!(s.relative_quad(), 4.0);
        assert_eq!(s.relative_cube(), 8.0);
        assert_eq!(s.relative_aspect(), 2.0);
        assert_eq!(s.absolute_linear(), 3.0);
        assert_eq!(s.relative_vector(), Vec3::new(2.0, 4.0, 2.0));
    }
}
