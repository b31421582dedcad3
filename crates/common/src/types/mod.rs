use serde::Serialize;

/// Body of `GET /healthcheck`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub app: &'static str,
}

impl Health {
    pub const fn ok() -> Self {
        Self { app: "OK" }
    }
}
