//! gRPC service implementations.

mod events_grpc;

pub use events_grpc::EventsGrpcService;
