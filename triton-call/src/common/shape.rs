use super::{type_not_support, LoweringError};
use digit_layout::DigitLayout;
use std::fmt;

/// 输入或输出数组的形状描述：元素类型和各维长度。
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShapeDescriptor {
    dt: DigitLayout,
    shape: Vec<usize>,
}

impl ShapeDescriptor {
    #[inline]
    pub fn new(dt: DigitLayout, shape: impl Into<Vec<usize>>) -> Self {
        Self {
            dt,
            shape: shape.into(),
        }
    }

    #[inline]
    pub fn dt(&self) -> DigitLayout {
        self.dt
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// 调用结果的张量类型，形如 `tensor<128x64xf32>`。
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TensorType {
    dt: DigitLayout,
    elem: &'static str,
    shape: Vec<usize>,
}

impl TensorType {
    #[inline]
    pub fn dt(&self) -> DigitLayout {
        self.dt
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
}

impl TryFrom<&ShapeDescriptor> for TensorType {
    type Error = LoweringError;

    fn try_from(desc: &ShapeDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            dt: desc.dt,
            elem: dt_name(desc.dt)?,
            shape: desc.shape.clone(),
        })
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tensor<")?;
        for d in &self.shape {
            write!(f, "{d}x")?;
        }
        write!(f, "{}>", self.elem)
    }
}

pub(crate) fn dt_name(dt: DigitLayout) -> Result<&'static str, LoweringError> {
    use digit_layout::types as ty;
    Ok(match dt {
        ty::Bool => "i1",

        ty::I8 => "i8",
        ty::I16 => "i16",
        ty::I32 => "i32",
        ty::I64 => "i64",

        ty::U8 => "ui8",
        ty::U16 => "ui16",
        ty::U32 => "ui32",
        ty::U64 => "ui64",

        ty::F16 => "f16",
        ty::BF16 => "bf16",
        ty::F32 => "f32",
        ty::F64 => "f64",

        _ => return Err(type_not_support(format!("{dt:?} has no tensor element type"))),
    })
}

#[cfg(test)]
mod test {
    use super::{ShapeDescriptor, TensorType};
    use digit_layout::types::{BF16, F32, U8};

    #[test]
    fn test_tensor_type() {
        let desc = ShapeDescriptor::new(F32, [128, 64]);
        assert_eq!(desc.ndim(), 2);
        let ty = TensorType::try_from(&desc).unwrap();
        assert_eq!(ty.dt(), F32);
        assert_eq!(ty.shape(), [128, 64]);
        assert_eq!(ty.to_string(), "tensor<128x64xf32>");

        let scalar = TensorType::try_from(&ShapeDescriptor::new(BF16, [])).unwrap();
        assert_eq!(scalar.to_string(), "tensor<bf16>");

        let bytes = TensorType::try_from(&ShapeDescriptor::new(U8, [7])).unwrap();
        assert_eq!(bytes.to_string(), "tensor<7xui8>");
    }
}
