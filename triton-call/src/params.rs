use crate::{invalid_params, LoweringError, Platform};
use std::collections::{btree_map, BTreeMap};

/// 后端参数子表的键。
pub const BACKEND_KEY: &str = "triton";
pub const NUM_WARPS: &str = "num_warps";
pub const NUM_STAGES: &str = "num_stages";
pub const SERIALIZED_METADATA: &str = "serialized_metadata";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParamValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Map(CompilerParams),
}

/// 编译参数表。
///
/// 每个调用点持有独立的一份，提取调优参数时会移除读到的键。
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct CompilerParams(BTreeMap<String, ParamValue>);

/// 后端调优参数。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TuningParams {
    pub num_warps: i32,
    pub num_stages: i32,
}

impl CompilerParams {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    /// 后端参数子表。没有 `"triton"` 子表时整张表就是后端参数。
    pub fn backend_mut(&mut self) -> Result<&mut Self, LoweringError> {
        let nested = match self.0.get(BACKEND_KEY) {
            None => false,
            Some(ParamValue::Map(_)) => true,
            Some(other) => {
                return Err(invalid_params(format!(
                    "`{BACKEND_KEY}` must be a map, got {other:?}"
                )))
            }
        };
        if !nested {
            return Ok(self);
        }
        let Some(ParamValue::Map(map)) = self.0.get_mut(BACKEND_KEY) else {
            unreachable!()
        };
        Ok(map)
    }

    /// 提取调优参数，返回提取后剩余的后端参数子表。
    pub fn into_tuning(
        mut self,
        platform: Platform,
    ) -> Result<(TuningParams, CompilerParams), LoweringError> {
        let tuning = TuningParams::extract(&mut self, platform)?;
        let rest = match self.0.remove(BACKEND_KEY) {
            Some(ParamValue::Map(map)) => map,
            Some(other) => {
                self.0.insert(BACKEND_KEY.into(), other);
                self
            }
            None => self,
        };
        Ok((tuning, rest))
    }

    /// 可选的序列化元信息。此字段不稳定，将来可能移除。
    pub fn serialized_metadata(&self) -> Result<Option<&str>, LoweringError> {
        match self.0.get(SERIALIZED_METADATA) {
            None => Ok(None),
            Some(ParamValue::Str(s)) => Ok(Some(s)),
            Some(other) => Err(invalid_params(format!(
                "`{SERIALIZED_METADATA}` must be a string, got {other:?}"
            ))),
        }
    }

    fn take_positive_i32(&mut self, key: &str) -> Result<Option<i32>, LoweringError> {
        match self.0.remove(key) {
            None => Ok(None),
            Some(ParamValue::Int(v)) => match i32::try_from(v) {
                Ok(v) if v > 0 => Ok(Some(v)),
                _ => Err(invalid_params(format!("`{key}` = {v}, positive i32 expected"))),
            },
            Some(other) => Err(invalid_params(format!(
                "`{key}` must be an integer, got {other:?}"
            ))),
        }
    }
}

impl TuningParams {
    /// 从参数表中取出 `num_warps` 和 `num_stages`，缺省值由平台决定。
    ///
    /// 读到的键会从表中移除，对同一张表再次提取将得到缺省值。
    pub fn extract(params: &mut CompilerParams, platform: Platform) -> Result<Self, LoweringError> {
        let backend = params.backend_mut()?;
        let defaults = platform.defaults();
        let num_warps = backend
            .take_positive_i32(NUM_WARPS)?
            .unwrap_or(defaults.num_warps);
        let num_stages = backend
            .take_positive_i32(NUM_STAGES)?
            .unwrap_or(defaults.num_stages);
        Ok(Self {
            num_warps,
            num_stages,
        })
    }
}

impl<'a> IntoIterator for &'a CompilerParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for CompilerParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

macro_rules! impl_from {
    ($( $ty:ty => $variant:ident )+) => {
        $(
            impl From<$ty> for ParamValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

impl_from! {
    i64            => Int
    i32            => Int
    u32            => Int
    bool           => Bool
    String         => Str
    &str           => Str
    CompilerParams => Map
}
