use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_timeout_sec() -> u64 {
    120
}

pub fn default_max_iterations() -> u32 {
    3
}

pub fn default_sub_task_count() -> usize {
    3
}

pub fn default_openai_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

pub fn default_openai_model() -> String {
    "llama3-8b-8192".to_string()
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

pub fn default_claude_binary() -> PathBuf {
    // Check common install location first
    if let Some(home) = std::env::var_os("HOME") {
        let local_path = PathBuf::from(home).join(".claude/local/claude");
        if local_path.exists() {
            return local_path;
        }
    }
    // Fall back to PATH lookup
    PathBuf::from("claude")
}

pub fn default_claude_model() -> String {
    "sonnet".to_string()
}

pub fn default_codex_binary() -> PathBuf {
    PathBuf::from("codex")
}

pub fn default_codex_model() -> String {
    "gpt-4.1".to_string()
}

pub fn default_scripted_responses() -> PathBuf {
    PathBuf::from("responses.yaml")
}

// A single attempt: generation failures are fatal unless retries are configured
pub fn default_max_attempts() -> u32 {
    1
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}
