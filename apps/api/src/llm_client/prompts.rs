/// System instruction for resume extraction. The user turn carries the raw
/// document text verbatim.
pub const RESUME_PARSE_SYSTEM: &str = "You are a resume parser. \
Extract candidate details and return JSON with this schema:\n\
{\n  \"name\": string,\n  \"email\": string,\n  \"phone\": string,\n  \"skills\": [string],\n  \"experience\": [string],\n  \"education\": [string]\n}";
