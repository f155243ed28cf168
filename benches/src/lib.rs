//! Benchmarks for the Codemate SDK. See `benches/`.
