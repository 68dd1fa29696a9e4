pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# ESCLI CONFIGURATION
# =============================================================================
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/escli/config.yml
#   3. /etc/escli/config.yml
#
# Command-line flags override values from this file. Any value may reference
# an environment variable using the $env{...} syntax.

# =============================================================================
# BACKEND
# =============================================================================
backend:
  address: http://localhost:9200
  username: elasticsearch
  password: secret
  # Per-request HTTP timeout: <n>ms, <n>s, <n>m or <n>h
  timeout: 30s

# =============================================================================
# SEARCH
# =============================================================================
search:
  # Index pattern, wildcards allowed
  index: log-aws-waf-*
  # Documents per scroll page
  page_size: 10000
  # How long the backend keeps the scroll cursor alive between pages
  scroll: 5m
  # Only fetch the fields extraction needs. Set to ~ to fetch whole documents.
  source_filter:
    - httpRequest.headers
  pretty: true
  # Send this query document instead of a built-in rule query
  # query_file: ~/queries/waf.json

# =============================================================================
# EXTRACTION
# =============================================================================
extraction:
  # JSON pointer to the header list inside each hit
  headers_pointer: /_source/httpRequest/headers
  # strict:  abort the run on the first undecodable amplitude_id cookie
  # lenient: log it, skip that cookie segment and continue
  on_decode_error: strict
"#
    .to_string()
}
