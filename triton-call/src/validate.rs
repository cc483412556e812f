use crate::{unsupported_feature, GridSpec, LoweringError};

/// 网格映射中与本降级路径相关的部分。
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GridMapping {
    /// 调用方声明的静态网格。
    pub grid: GridSpec,
    pub num_dynamic_grid_bounds: usize,
    pub num_index_operands: usize,
}

impl GridMapping {
    #[inline]
    pub fn new(grid: impl Into<GridSpec>) -> Self {
        Self {
            grid: grid.into(),
            num_dynamic_grid_bounds: 0,
            num_index_operands: 0,
        }
    }

    /// 在编译内核之前拒绝此路径不支持的特性。
    pub fn check(&self) -> Result<(), LoweringError> {
        if self.num_dynamic_grid_bounds != 0 {
            return Err(unsupported_feature(format!(
                "dynamic grid bounds not supported ({} requested)",
                self.num_dynamic_grid_bounds
            )));
        }
        if self.num_index_operands != 0 {
            return Err(unsupported_feature(format!(
                "scalar prefetch not supported ({} index operands)",
                self.num_index_operands
            )));
        }
        self.grid.normalize()?;
        Ok(())
    }
}
