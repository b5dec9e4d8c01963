//! Pipeline stages for PDF summarisation.
//!
//! Each submodule implements exactly one step, so each can be tested
//! without the others and the model backend can change without touching
//! extraction or detection.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ detect ──▶ target ──▶ llm
//! (pdf text)  (lingua)   (pref.)    (Gemini / provider)
//! ```
//!
//! 1. [`extract`] — pull the text layer out of the PDF bytes; runs in
//!    `spawn_blocking` because parsing is CPU-bound
//! 2. [`detect`]  — identify the language from a prefix sample
//! 3. [`target`]  — decide the output language from the caller's preference
//! 4. [`llm`]     — send the prompt to the model; the only stage with
//!    network I/O

pub mod detect;
pub mod extract;
pub mod llm;
pub mod target;
