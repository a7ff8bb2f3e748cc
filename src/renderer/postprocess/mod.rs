//! Screen-space passes for the centerpiece: bloom and the tone-mapping
//! composite.

/// Threshold, mip-chain blur, and upsample.
pub mod bloom;
/// Scene + bloom tone mapping into the swapchain.
pub mod composite;
/// Orchestration of the passes and their targets.
pub mod post_process;
