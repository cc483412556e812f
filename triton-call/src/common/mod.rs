mod error;
mod shape;

pub use error::{functions::*, LoweringError, LoweringErrorKind};
pub use shape::{ShapeDescriptor, TensorType};

#[cfg(test)]
#[allow(dead_code)]
pub(crate) mod test_utils {
    use crate::{
        lowering_failure, GridMapping, GridSpec, KernelModule, LoweredModule, LoweringError,
        ModuleLowering, Platform, ShapeDescriptor,
    };
    use std::{
        io,
        sync::{
            atomic::{AtomicUsize, Ordering::SeqCst},
            Mutex,
        },
    };

    /// 记录调用情况的模块降级替身。
    pub struct FakeLowering {
        pub grid: Option<GridSpec>,
        pub fail: Option<String>,
        pub bytecode: Vec<u8>,
        calls: AtomicUsize,
        seen: Mutex<Vec<Seen>>,
    }

    #[derive(Clone, Debug)]
    pub struct Seen {
        pub shapes: Vec<ShapeDescriptor>,
        pub name: String,
        pub platform: Platform,
    }

    #[derive(Debug)]
    pub struct FakeProgram(pub &'static str);

    pub struct FakeModule {
        bytecode: Vec<u8>,
        name: String,
    }

    impl FakeLowering {
        pub fn new() -> Self {
            Self {
                grid: None,
                fail: None,
                bytecode: b"ML\xefR".to_vec(),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(vec![]),
            }
        }

        /// 替身返回的网格，默认使用网格映射中声明的网格。
        pub fn with_grid(mut self, grid: impl Into<GridSpec>) -> Self {
            self.grid = Some(grid.into());
            self
        }

        pub fn failing(mut self, info: &str) -> Self {
            self.fail = Some(info.into());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(SeqCst)
        }

        pub fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl KernelModule for FakeModule {
        fn write_bytecode(&self, w: &mut impl io::Write) -> io::Result<()> {
            w.write_all(&self.bytecode)
        }

        fn asm(&self) -> String {
            format!("module @{} {{}}", self.name)
        }
    }

    impl ModuleLowering for FakeLowering {
        type Program = FakeProgram;
        type Module = FakeModule;

        fn lower_module(
            &self,
            _program: &Self::Program,
            shapes: &[ShapeDescriptor],
            grid_mapping: &GridMapping,
            name: &str,
            platform: Platform,
        ) -> Result<LoweredModule<Self::Module>, LoweringError> {
            self.calls.fetch_add(1, SeqCst);
            self.seen.lock().unwrap().push(Seen {
                shapes: shapes.to_vec(),
                name: name.into(),
                platform,
            });
            if let Some(info) = &self.fail {
                return Err(lowering_failure(info.clone()));
            }
            Ok(LoweredModule {
                module: FakeModule {
                    bytecode: self.bytecode.clone(),
                    name: name.into(),
                },
                grid: self
                    .grid
                    .clone()
                    .unwrap_or_else(|| grid_mapping.grid.clone()),
            })
        }
    }
}
