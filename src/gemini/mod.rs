//! Client for the Gemini `generateContent` REST endpoint.
mod core;

pub use self::core::{
    API_VERSION, Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part, Role,
    generate_content, generate_content_url,
};
