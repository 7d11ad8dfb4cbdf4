// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelPackError(pub String);

impl std::fmt::Display for KernelPackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "kernelpack error: {}", self.0)
    }
}

impl std::error::Error for KernelPackError {}

impl From<serde_json::Error> for KernelPackError {
    fn from(e: serde_json::Error) -> Self {
        KernelPackError(format!("invalid kernel configuration: {e}"))
    }
}
