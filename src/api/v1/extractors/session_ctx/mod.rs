/*!
 * Session context extractor
 *
 * Responsibility:
 * - cookie → session store → role を解決し、SessionCtx として handler に渡す
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - SessionCtx
 * - SessionCtxExtractor
 */

mod core;
mod types;

pub use self::core::SessionCtxExtractor;
pub use self::types::SessionCtx;
