// Build constraints
//
// A package file only counts when it would be compiled for the current
// target: its `_GOOS` / `_GOARCH` file name suffixes and its `//go:build`
// expression must both match.

use std::path::Path;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Target platform files are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    /// `$GOOS` / `$GOARCH` as `go generate` exports them, else the host.
    pub fn from_env() -> Self {
        let goos = std::env::var("GOOS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goos().to_string());
        let goarch = std::env::var("GOARCH")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| host_goarch().to_string());
        Self { goos, goarch }
    }

    pub fn matches_tag(&self, tag: &str) -> bool {
        tag == self.goos
            || tag == self.goarch
            || tag == "gc"
            || (tag == "unix" && UNIX_OS.contains(&self.goos.as_str()))
            || (tag == "linux" && self.goos == "android")
            || (tag == "darwin" && self.goos == "ios")
            || (tag == "solaris" && self.goos == "illumos")
            || is_release_tag(tag)
    }

    /// `x_linux.go`, `x_amd64.go` and `x_linux_amd64.go` only build on
    /// matching targets. Everything before the first `_` is ignored.
    pub fn matches_file_name(&self, path: &Path) -> bool {
        let stem = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.split('.').next().unwrap_or(name),
            None => return true,
        };
        let stem = stem.strip_suffix("_test").unwrap_or(stem);
        let suffix = match stem.find('_') {
            Some(i) => &stem[i..],
            None => return true,
        };

        let parts: Vec<&str> = suffix.split('_').collect();
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 2]) && self.matches_tag(parts[n - 1]);
        }
        if KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluate a `//go:build` expression. `None` when it does not parse.
    pub fn eval(&self, expr: &str) -> Option<bool> {
        let tokens = tokenize(expr)?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            ctx: self,
        };
        let value = parser.or()?;
        (parser.pos == tokens.len()).then_some(value)
    }
}

/// `go1.N` tags hold for any toolchain recent enough to run this tool.
fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        "wasm32" => "wasm",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Not,
    And,
    Or,
    Open,
    Close,
    Tag(String),
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '!' => tokens.push(Token::Not),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '&' if chars.next_if_eq(&'&').is_some() => tokens.push(Token::And),
            '|' if chars.next_if_eq(&'|').is_some() => tokens.push(Token::Or),
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = c.to_string();
                while let Some(next) = chars.next_if(|n| n.is_alphanumeric() || *n == '_' || *n == '.') {
                    tag.push(next);
                }
                tokens.push(Token::Tag(tag));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ctx: &'a BuildContext,
}

impl ExprParser<'_> {
    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Option<bool> {
        let mut value = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and(&mut self) -> Option<bool> {
        let mut value = self.not()?;
        while self.eat(&Token::And) {
            let rhs = self.not()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn not(&mut self) -> Option<bool> {
        if self.eat(&Token::Not) {
            return self.not().map(|v| !v);
        }
        if self.eat(&Token::Open) {
            let value = self.or()?;
            return self.eat(&Token::Close).then_some(value);
        }
        match self.tokens.get(self.pos)? {
            Token::Tag(tag) => {
                self.pos += 1;
                Some(self.ctx.matches_tag(tag))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_amd64() -> BuildContext {
        BuildContext::new("linux", "amd64")
    }

    #[test]
    fn test_eval_build_expressions() {
        let ctx = linux_amd64();
        assert_eq!(ctx.eval("ignore"), Some(false));
        assert_eq!(ctx.eval("linux"), Some(true));
        assert_eq!(ctx.eval("!windows"), Some(true));
        assert_eq!(ctx.eval("linux && !amd64"), Some(false));
        assert_eq!(ctx.eval("(darwin || linux) && amd64"), Some(true));
        assert_eq!(ctx.eval("unix && go1.18"), Some(true));
        assert_eq!(ctx.eval("tools || integration"), Some(false));
    }

    #[test]
    fn test_eval_rejects_malformed_expressions() {
        let ctx = linux_amd64();
        for expr in ["", "linux &&", "(linux", "linux)", "linux & amd64", "linux amd64"] {
            assert_eq!(ctx.eval(expr), None, "{:?} should not parse", expr);
        }
    }

    #[test]
    fn test_matches_file_name() {
        let ctx = linux_amd64();
        assert!(ctx.matches_file_name(Path::new("user.go")));
        assert!(ctx.matches_file_name(Path::new("user_linux.go")));
        assert!(ctx.matches_file_name(Path::new("user_linux_amd64.go")));
        assert!(ctx.matches_file_name(Path::new("user_helper.go")));
        assert!(ctx.matches_file_name(Path::new("linux.go")), "a bare name is not a suffix");
        assert!(!ctx.matches_file_name(Path::new("user_windows.go")));
        assert!(!ctx.matches_file_name(Path::new("user_arm64.go")));
        assert!(!ctx.matches_file_name(Path::new("user_linux_arm64.go")));
    }

    #[test]
    fn test_os_aliases() {
        let android = BuildContext::new("android", "arm64");
        assert!(android.matches_tag("linux"));
        assert!(android.matches_tag("unix"));
        assert!(!BuildContext::new("windows", "amd64").matches_tag("unix"));
    }
}
