//! Pipeline stages for V3 → V4 layout conversion.
//!
//! Each submodule implements exactly one step, so each is testable without
//! the others and the network stage can be swapped for a fake.
//!
//! ## Data Flow
//!
//! ```text
//! examples ──▶ messages ──▶ llm ──▶ validate
//! (few-shot)   (prompt)     (HTTP)  (elType check)
//! ```
//!
//! 1. [`examples`]: load up to N before/after pairs; failures are skipped
//! 2. [`messages`]: system prompt, example turns, then the input document
//! 3. [`llm`]: one chat-completion call; the only stage with network I/O
//! 4. [`validate`]: parse the completion and check the `elType` invariant

pub mod examples;
pub mod llm;
pub mod messages;
pub mod validate;
