//! Configuration sources that produce work items.
//!
//! - [`args`]: three parallel command-line lists paired by index
//! - [`descriptor`]: the reserved array in the host project's `package.json`

pub mod args;
pub mod descriptor;
