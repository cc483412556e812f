use crate::ShapeDescriptor;

/// 维度从最内层到最外层的排列。
pub type Layout = Vec<usize>;

/// 行主序数组的布局：`[ndim - 1, ..., 0]`。
#[inline]
pub fn minor_to_major(ndim: usize) -> Layout {
    (0..ndim).rev().collect()
}

pub fn derive_layouts<'a>(shapes: impl IntoIterator<Item = &'a ShapeDescriptor>) -> Vec<Layout> {
    shapes
        .into_iter()
        .map(|shape| minor_to_major(shape.ndim()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::{derive_layouts, minor_to_major};
    use crate::ShapeDescriptor;
    use digit_layout::types::{F16, F32, I32};
    use rand::Rng;

    #[test]
    fn test_layouts() {
        let shapes = [
            ShapeDescriptor::new(F32, [128]),
            ShapeDescriptor::new(F16, [4, 32, 64]),
            ShapeDescriptor::new(I32, []),
        ];
        assert_eq!(
            derive_layouts(&shapes),
            [vec![0], vec![2, 1, 0], vec![]]
        );
    }

    #[test]
    fn test_random_rank() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let ndim = rng.random_range(0..=8);
            let layout = minor_to_major(ndim);
            assert_eq!(layout.len(), ndim);
            for (i, &d) in layout.iter().enumerate() {
                assert_eq!(d, ndim - 1 - i);
            }
        }
    }
}
