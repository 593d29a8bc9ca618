// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   model_store.rs — Model artifact persistence
//                    Writes the trained vectors plus metadata
//                    with bincode, and a JSON sidecar for
//                    humans. Loads and validates them for the
//                    query side.
//
//   config.rs      — Hyperparameter configuration
//                    Reads the optional JSON hyperparameter
//                    file, falling back to baseline values.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model artifact saving and loading
pub mod model_store;

/// Hyperparameter configuration file
pub mod config;
