//! # Runner Module / 运行器模块
//!
//! Executes generated assets out of process and turns what comes back into
//! structured results. Every run prepares an isolated workspace, hands it to
//! a [`Dispatcher`], collects and parses the output, and always cleans up.
//!
//! 在进程外执行生成的资产，并将返回内容转换为结构化结果。每次运行都会准备独立的工作区，
//! 交给 [`Dispatcher`] 执行，收集并解析输出，并且总会清理。

pub mod context;
pub mod dispatcher;
pub mod execution;
pub mod jsonpath;
pub mod quick;
pub mod stats;
pub mod workspace;

pub use context::ExecutionContext;
pub use dispatcher::{DispatchInvocation, DispatchOutput, Dispatcher, ProcessDispatcher};
pub use execution::TestRunnerService;
pub use quick::{QuickApiRequest, QuickApiResult};
