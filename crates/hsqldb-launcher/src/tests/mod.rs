//! Test suites for the launch sequence and the runtime wiring.

mod support;
