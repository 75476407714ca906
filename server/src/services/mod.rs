//! Services: search logic behind the HTTP routes.
//!
//! DESIGN
//! ======
//! Routes stay thin: parameter validation and status mapping live in
//! `routes`, everything that talks to the LLM or the corpus lives here.
//! LLM-backed services take `&dyn LlmChat` so tests can inject a mock.

pub mod derivatives;
pub mod passages;
pub mod suggest;
pub mod testimonies;
