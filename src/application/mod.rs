// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal at a time (training a model, or answering a query).
//
// Rules for this layer:
//   - No vector maths here (that's Layer 5)
//   - No printing or HTTP here (that's Layer 1)
//   - No direct file formats here (Layers 4 and 6)
//   - Only workflow coordination and error mapping
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The nearest-neighbour query workflow
pub mod similar_use_case;
