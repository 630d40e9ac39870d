pub mod server;

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Server { port: u16, backend_url: String },
}
