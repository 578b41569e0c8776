pub mod impl_fake;
pub mod impl_tract_onnx;
pub mod interface;
pub mod invoker;
pub mod labels;
pub mod models;
pub mod preprocess;
pub mod rank;
pub mod tensor;
