use crate::{invalid_grid, LoweringError};

/// 发射网格的规格：单个整数，或至多 3 个整数。
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GridSpec {
    Scalar(u32),
    Dims(Vec<u32>),
}

/// 规范化的三维网格。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridSpec {
    #[inline]
    pub fn dims(&self) -> &[u32] {
        match self {
            Self::Scalar(n) => std::slice::from_ref(n),
            Self::Dims(dims) => dims,
        }
    }

    /// 将网格补齐为三维，缺省的维度填 1。
    pub fn normalize(&self) -> Result<Dim3, LoweringError> {
        let dims = self.dims();
        if dims.len() > 3 {
            return Err(invalid_grid(format!(
                "grid must have three or fewer dimensions, got {dims:?}"
            )));
        }
        if let Some(i) = dims.iter().position(|&d| d == 0) {
            return Err(invalid_grid(format!("grid[{i}] = 0, must be positive")));
        }

        let mut padded = [1; 3];
        padded[..dims.len()].copy_from_slice(dims);
        let [x, y, z] = padded;
        Ok(Dim3 { x, y, z })
    }
}

impl Dim3 {
    /// 转换为后端配置中使用的 32 位有符号整数。
    pub fn to_i32(self) -> Result<[i32; 3], LoweringError> {
        let convert = |axis: &str, d: u32| {
            i32::try_from(d).map_err(|_| invalid_grid(format!("grid_{axis} = {d} overflows i32")))
        };
        Ok([
            convert("x", self.x)?,
            convert("y", self.y)?,
            convert("z", self.z)?,
        ])
    }
}

impl From<u32> for GridSpec {
    #[inline]
    fn from(value: u32) -> Self {
        Self::Scalar(value)
    }
}

impl<const N: usize> From<[u32; N]> for GridSpec {
    #[inline]
    fn from(value: [u32; N]) -> Self {
        Self::Dims(value.into())
    }
}

impl From<Vec<u32>> for GridSpec {
    #[inline]
    fn from(value: Vec<u32>) -> Self {
        Self::Dims(value)
    }
}

impl From<&[u32]> for GridSpec {
    #[inline]
    fn from(value: &[u32]) -> Self {
        Self::Dims(value.to_vec())
    }
}

impl From<Dim3> for (u32, u32, u32) {
    #[inline]
    fn from(Dim3 { x, y, z }: Dim3) -> Self {
        (x, y, z)
    }
}

impl From<Dim3> for [u32; 3] {
    #[inline]
    fn from(Dim3 { x, y, z }: Dim3) -> Self {
        [x, y, z]
    }
}
