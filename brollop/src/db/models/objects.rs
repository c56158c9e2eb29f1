/// Request to store an object under a caller-chosen name
#[derive(Debug, Clone)]
pub struct ObjectPutRequest {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// An object read back from storage
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
}
