/// Size of a container, window or render surface in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Replace each zero axis with the matching axis of `fallback`
    pub fn or(self, fallback: Dimensions) -> Self {
        Self {
            width: if self.width == 0 { fallback.width } else { self.width },
            height: if self.height == 0 { fallback.height } else { self.height },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, 1.0 for a degenerate height
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Length of the shorter side
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_new() {
        let dims = Dimensions::new(1920, 1080);
        assert_eq!(dims.width, 1920);
        assert_eq!(dims.height, 1080);
    }

    #[test]
    fn test_fallback_per_axis() {
        let window = Dimensions::new(1280, 720);

        assert_eq!(Dimensions::new(0, 0).or(window), window);
        assert_eq!(Dimensions::new(400, 0).or(window), Dimensions::new(400, 720));
        assert_eq!(Dimensions::new(0, 300).or(window), Dimensions::new(1280, 300));
        assert_eq!(Dimensions::new(400, 300).or(window), Dimensions::new(400, 300));
    }

    #[test]
    fn test_aspect_and_min_side() {
        let dims = Dimensions::new(400, 300);
        assert!((dims.aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(dims.min_side(), 300);
        assert_eq!(Dimensions::new(10, 0).aspect(), 1.0);
    }

    #[test]
    fn test_is_empty() {
        assert!(Dimensions::default().is_empty());
        assert!(Dimensions::new(0, 10).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }
}
