mod gemini;
mod session_flow;
