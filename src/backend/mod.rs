pub mod rodio;

pub use self::rodio::RodioEngine;
