use crate::KeywordEntry;

const fn entry(name: &'static str, keywords: &'static [&'static str]) -> KeywordEntry {
    KeywordEntry { name, keywords }
}

// ---------------
// Technologies
// ---------------

pub const LANGUAGES: &[KeywordEntry] = &[
    entry(
        "javascript",
        &["javascript", "js", "node", "nodejs", "npm", "ecmascript"],
    ),
    entry("typescript", &["typescript", "ts", "tsx", "tsc", "tsconfig"]),
    entry("python", &["python", "pip", "pypi", "py", "virtualenv", "conda"]),
    entry("rust", &["rust", "cargo", "crate", "rustc", "rustup"]),
    entry("go", &["golang", "go", "goroutine", "go.mod"]),
    entry("java", &["java", "maven", "gradle", "jvm", "jar"]),
    entry("ruby", &["ruby", "gem", "bundler", "rubygems"]),
    entry("php", &["php", "composer", "packagist"]),
    entry("csharp", &["c#", "csharp", ".net", "dotnet", "nuget"]),
    entry("cpp", &["c++", "cpp", "cmake", "clang"]),
    entry("swift", &["swift", "swiftui", "xcode", "cocoapods"]),
    entry("kotlin", &["kotlin", "ktor", "kotlinx"]),
];

pub const FRAMEWORKS: &[KeywordEntry] = &[
    entry("react", &["react", "jsx", "usestate", "useeffect", "react-dom"]),
    entry("vue", &["vue", "vuex", "nuxt", "pinia"]),
    entry("angular", &["angular", "ngmodule", "rxjs"]),
    entry("nextjs", &["next.js", "nextjs", "getserversideprops"]),
    entry("express", &["express", "middleware", "app.get"]),
    entry("django", &["django", "manage.py", "orm"]),
    entry("flask", &["flask", "jinja", "werkzeug"]),
    entry("fastapi", &["fastapi", "pydantic", "uvicorn"]),
    entry("spring", &["spring", "spring boot", "springframework"]),
    entry("rails", &["rails", "ruby on rails", "activerecord"]),
    entry("tokio", &["tokio", "async", "await"]),
    entry("actix", &["actix", "actix-web"]),
];

pub const TOOLS: &[KeywordEntry] = &[
    entry("docker", &["docker", "dockerfile", "container", "docker-compose"]),
    entry("kubernetes", &["kubernetes", "k8s", "kubectl", "helm"]),
    entry("git", &["git", "github", "gitlab", "commit"]),
    entry("webpack", &["webpack", "bundle", "loader"]),
    entry("vite", &["vite", "rollup", "esbuild"]),
    entry("jest", &["jest", "vitest", "mocha"]),
    entry("eslint", &["eslint", "prettier", "lint"]),
    entry("terraform", &["terraform", "hcl", "tfstate"]),
    entry("github-actions", &["github actions", "workflow", "ci"]),
    entry("aws", &["aws", "lambda", "s3", "ec2"]),
];

// ---------------
// Topics
// ---------------

pub const TOPICS: &[KeywordEntry] = &[
    entry(
        "web-development",
        &["web", "frontend", "backend", "http", "browser", "website"],
    ),
    entry(
        "machine-learning",
        &["machine learning", "ml", "model", "training", "neural", "dataset"],
    ),
    entry(
        "devops",
        &["devops", "deployment", "deploy", "pipeline", "infrastructure"],
    ),
    entry(
        "security",
        &["security", "authentication", "encryption", "vulnerability", "auth"],
    ),
    entry(
        "database",
        &["database", "sql", "postgres", "mysql", "mongodb", "query"],
    ),
    entry("api", &["api", "rest", "graphql", "endpoint", "sdk"]),
    entry("testing", &["testing", "test", "coverage", "unit test", "e2e"]),
    entry("cli", &["cli", "command line", "terminal", "shell"]),
    entry(
        "education",
        &["tutorial", "course", "lesson", "learn", "exercise", "workshop"],
    ),
    entry("mobile", &["mobile", "ios", "android", "react native", "flutter"]),
    entry(
        "data-science",
        &["data science", "pandas", "numpy", "jupyter", "analytics"],
    ),
    entry(
        "blockchain",
        &["blockchain", "ethereum", "smart contract", "web3", "solidity"],
    ),
    entry("game-development", &["game", "unity", "godot", "sprite", "engine"]),
];

// ---------------
// Audience
// ---------------

pub const BEGINNER_INDICATORS: &[&str] = &[
    "beginner",
    "beginners",
    "tutorial",
    "getting started",
    "introduction",
    "simple",
    "easy",
    "step-by-step",
    "first",
    "basics",
];

pub const ADVANCED_INDICATORS: &[&str] = &[
    "advanced",
    "architecture",
    "performance",
    "optimization",
    "internals",
    "scalable",
    "production",
    "low-level",
    "concurrency",
    "benchmark",
];

pub const RESEARCH_INDICATORS: &[&str] = &[
    "research",
    "paper",
    "citation",
    "arxiv",
    "experiment",
    "thesis",
    "publication",
    "cite",
    "hypothesis",
];

// ---------------
// Sentiment
// ---------------

pub const SENTIMENT: &[(&str, i32)] = &[
    ("awesome", 4),
    ("excellent", 3),
    ("great", 3),
    ("love", 3),
    ("best", 3),
    ("powerful", 2),
    ("easy", 1),
    ("fast", 2),
    ("simple", 1),
    ("robust", 2),
    ("reliable", 2),
    ("clean", 2),
    ("elegant", 2),
    ("efficient", 2),
    ("good", 3),
    ("nice", 3),
    ("helpful", 2),
    ("lightweight", 1),
    ("secure", 2),
    ("free", 1),
    ("bug", -2),
    ("bugs", -2),
    ("broken", -2),
    ("deprecated", -2),
    ("slow", -2),
    ("error", -2),
    ("errors", -2),
    ("fail", -2),
    ("fails", -2),
    ("problem", -2),
    ("hard", -1),
    ("difficult", -1),
    ("crash", -3),
    ("unstable", -2),
    ("bad", -3),
    ("outdated", -2),
    ("vulnerable", -2),
    ("warning", -1),
];

// ---------------
// Cross reference
// ---------------

pub const FRAMEWORK_LANGUAGES: &[(&str, &[&str])] = &[
    ("react", &["javascript", "typescript"]),
    ("vue", &["javascript", "typescript"]),
    ("angular", &["typescript", "javascript"]),
    ("nextjs", &["javascript", "typescript"]),
    ("express", &["javascript", "typescript"]),
    ("django", &["python"]),
    ("flask", &["python"]),
    ("fastapi", &["python"]),
    ("spring", &["java", "kotlin"]),
    ("rails", &["ruby"]),
    ("tokio", &["rust"]),
    ("actix", &["rust"]),
];

// ---------------
// Section names
// ---------------

pub const INTRO_SECTION_TERMS: &[&str] = &["introduction", "overview", "about"];

pub const INSTALL_SECTION_TERMS: &[&str] = &["install", "setup", "getting started"];

pub const RESOURCE_SECTION_TERMS: &[&str] = &["tool", "resource"];
