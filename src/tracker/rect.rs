//! Axis-aligned bounding box with overlap primitives.

/// Denominator guard for IoU against degenerate unions.
const UNION_EPS: f32 = 1e-6;

/// Axis-aligned bounding box in TLBR format (top-left x/y, bottom-right x/y).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x1: f32,
    /// Top-left y coordinate
    pub y1: f32,
    /// Bottom-right x coordinate
    pub x2: f32,
    /// Bottom-right y coordinate
    pub y2: f32,
}

impl Rect {
    /// Create a new Rect from TLBR coordinates.
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a Rect from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Get the area of the bounding box. Negative for inverted boxes.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether the box has no usable extent (zero or negative area).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Degenerate boxes score 0 against everything; identical valid boxes
    /// score exactly 1; disjoint boxes score exactly 0.
    pub fn iou(&self, other: &Rect) -> f32 {
        let area_a = self.area();
        let area_b = other.area();
        if area_a <= 0.0 || area_b <= 0.0 {
            return 0.0;
        }

        let inter_width = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let inter_height = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let inter_area = inter_width * inter_height;
        if inter_area <= 0.0 {
            return 0.0;
        }

        let union_area = area_a + area_b - inter_area;
        if union_area <= UNION_EPS {
            return 0.0;
        }
        inter_area / union_area
    }

    /// Blend towards `target`: `alpha * target + (1 - alpha) * self`, per coordinate.
    ///
    /// Used for track box smoothing; `alpha = 1.0` returns `target` unchanged.
    pub fn blend(&self, target: &Rect, alpha: f32) -> Rect {
        let keep = 1.0 - alpha;
        Rect {
            x1: alpha * target.x1 + keep * self.x1,
            y1: alpha * target.y1 + keep * self.y1,
            x2: alpha * target.x2 + keep * self.x2,
            y2: alpha * target.y2 + keep * self.y2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tlwh_conversion() {
        let rect = Rect::from_tlwh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 40.0);
        assert_eq!(rect.center(), (25.0, 40.0));
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(3.0, 4.0, 12.0, 9.0);
        assert_eq!(a.iou(&b), b.iou(&a));
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_degenerate_boxes() {
        let zero = Rect::new(5.0, 5.0, 5.0, 5.0);
        let inverted = Rect::new(10.0, 10.0, 0.0, 0.0);
        let valid = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(zero.iou(&valid), 0.0);
        assert_eq!(valid.iou(&zero), 0.0);
        assert_eq!(inverted.iou(&valid), 0.0);
        assert_eq!(inverted.iou(&inverted), 0.0);
    }

    #[test]
    fn test_blend() {
        let old = Rect::new(0.0, 0.0, 10.0, 10.0);
        let det = Rect::new(10.0, 10.0, 20.0, 20.0);

        let smoothed = old.blend(&det, 0.7);
        assert!((smoothed.x1 - 7.0).abs() < 1e-6);
        assert!((smoothed.y2 - 17.0).abs() < 1e-6);

        assert_eq!(old.blend(&det, 1.0), det);
    }
}
