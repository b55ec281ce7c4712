//! gRPC service implementations.

mod user_grpc;

pub use user_grpc::UserGrpcService;
