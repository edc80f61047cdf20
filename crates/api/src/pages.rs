use index::LabelCount;
use ingest::Label;
use query::{DetectionOutcome, DetectionReport, Verdict};
use report::DatasetStats;

use crate::config::Connection;

/// Entities shown in the evidence section.
pub const EVIDENCE_ENTITIES: usize = 6;

const STYLE: &str = r#"
    body { margin: 0; font-family: sans-serif; background-color: #f8f9fa; display: flex; }
    nav { width: 240px; min-height: 100vh; background: #ffffff; padding: 20px; box-shadow: 2px 0 6px rgba(0,0,0,0.05); }
    nav a { display: block; padding: 10px; color: #333; text-decoration: none; border-radius: 5px; }
    nav a.active { background-color: #FF4B4B; color: white; }
    main { flex: 1; padding: 30px; }
    .badge { padding: 8px; border-radius: 5px; margin: 6px 0; }
    .badge-ok { background: #d4edda; color: #155724; }
    .badge-down { background: #f8d7da; color: #721c24; }
    .metrics { display: flex; gap: 20px; }
    .status-card { padding: 20px; border-radius: 10px; background-color: white; box-shadow: 0 4px 6px rgba(0,0,0,0.1); margin-bottom: 20px; flex: 1; }
    .metric-value { font-size: 2em; font-weight: bold; }
    .charts { display: flex; gap: 20px; }
    .warning { background: #fff3cd; color: #856404; padding: 12px; border-radius: 5px; }
    .error { background: #f8d7da; color: #721c24; padding: 12px; border-radius: 5px; }
    .info { background: #d1ecf1; color: #0c5460; padding: 12px; border-radius: 5px; }
    .banner { padding: 20px; border-radius: 10px; color: white; text-align: center; margin-bottom: 20px; }
    .banner h1 { margin: 0; }
    .banner-fake { background-color: #ff4b4b; }
    .banner-real { background-color: #28a745; }
    .verdict-fake { color: #FF4B4B; font-weight: bold; font-size: 24px; }
    .verdict-real { color: #28a745; font-weight: bold; font-size: 24px; }
    textarea { width: 100%; height: 150px; }
    button { width: 100%; border-radius: 5px; height: 3em; background-color: #FF4B4B; color: white; font-weight: bold; border: none; }
    button:hover { background-color: #FF3333; }
    pre.analysis { background: white; padding: 15px; border-radius: 5px; white-space: pre-wrap; }
    .entities { display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; }
    .caption { color: grey; font-size: 0.9em; }
    footer { text-align: center; color: grey; margin-top: 40px; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Detector,
    Graph,
    About,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Detector, Page::Graph, Page::About];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::Detector => "/detector",
            Page::Graph => "/graph",
            Page::About => "/about",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Detector => "Detector",
            Page::Graph => "Graph View",
            Page::About => "About",
        }
    }
}

/// Connection state shown on every page.
pub struct Sidebar<'a> {
    pub graph: &'a Connection,
    pub llm: &'a Connection,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 12345 -> "12,345"
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn badge(name: &str, status: &Connection) -> String {
    let class = if status.is_connected() { "badge-ok" } else { "badge-down" };
    let title = match status {
        Connection::Connected => String::new(),
        Connection::Disconnected(reason) => format!(" title=\"{}\"", escape(reason)),
    };
    format!(
        "<div class=\"badge {}\"{}>{}: {}</div>",
        class, title, name, status
    )
}

pub fn layout(page: Page, sidebar: &Sidebar, body: &str) -> String {
    let links: String = Page::ALL
        .iter()
        .map(|p| {
            let class = if *p == page { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", p.path(), class, p.title())
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>GuardianAI | {title}</title>
<style>{style}</style>
</head>
<body>
<nav>
  <h2>🛡️ GuardianAI</h2>
  {links}
  <hr>
  <h3>System Status</h3>
  {graph}
  {llm}
</nav>
<main>
{body}
<footer><hr><p>GuardianAI © 2025 | Powered by Neo4j &amp; Groq</p></footer>
</main>
</body>
</html>
"#,
        title = page.title(),
        style = STYLE,
        links = links,
        graph = badge("Neo4j", sidebar.graph),
        llm = badge("Groq", sidebar.llm),
        body = body,
    )
}

/// Charts and counts for the dashboard, computed from the cleaned dataset.
pub struct DashboardData {
    pub stats: DatasetStats,
    pub pie_svg: String,
    pub bars_svg: String,
}

fn metric(name: &str, value: usize) -> String {
    format!(
        "<div class=\"status-card\"><div>{}</div><div class=\"metric-value\">{}</div></div>",
        escape(name),
        thousands(value)
    )
}

pub fn dashboard(data: Result<&DashboardData, &str>) -> String {
    let data = match data {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "<h1>📊 News Dataset Analysis</h1>\n<div class=\"warning\">Could not load analysis data: {}. Please run clean_data first.</div>",
                escape(e)
            );
        }
    };
    let stats = &data.stats;

    let legend: String = Label::ALL
        .iter()
        .map(|&label| {
            let share = if stats.total > 0 {
                stats.count(label) as f64 * 100.0 / stats.total as f64
            } else {
                0.0
            };
            format!(
                "<li><span class=\"verdict-{}\">■</span> {}: {:.1}%</li>",
                label.as_str().to_lowercase(),
                label,
                share
            )
        })
        .collect();

    let subject_rows: String = stats
        .subjects
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.subject),
                thousands(row.fake),
                thousands(row.real)
            )
        })
        .collect();

    format!(
        r#"<h1>📊 News Dataset Analysis</h1>
<div class="metrics">
{total}
{fake}
{real}
</div>
<hr>
<div class="charts">
  <div class="status-card">
    <h3>Distribution by Label</h3>
    {pie}
    <ul>{legend}</ul>
  </div>
  <div class="status-card">
    <h3>Top Subjects</h3>
    {bars}
    <table><tr><th>Subject</th><th>FAKE</th><th>REAL</th></tr>{subject_rows}</table>
  </div>
</div>"#,
        total = metric("Total Articles", stats.total),
        fake = metric("Fake News", stats.count(Label::Fake)),
        real = metric("Real News", stats.count(Label::Real)),
        pie = data.pie_svg,
        legend = legend,
        bars = data.bars_svg,
        subject_rows = subject_rows,
    )
}

pub fn detector(query: &str, outcome: Option<&DetectionOutcome>) -> String {
    let result = match outcome {
        None => String::new(),
        Some(DetectionOutcome::EmptyQuery) => {
            "<div class=\"warning\">Please enter some text to analyze.</div>".to_string()
        }
        Some(DetectionOutcome::Report(report)) => detection_report(report),
    };

    format!(
        r#"<h1>🛡️ Fake News Detector</h1>
<p>Analyze news headlines or full articles using our <strong>Graph RAG Pipeline</strong>.</p>
<form method="post" action="/detector">
  <label for="query">Paste news headline or text here:</label>
  <textarea id="query" name="query" placeholder="Ex: Breaking news about election fraud...">{query}</textarea>
  <button type="submit">Analyze Credibility</button>
</form>
{result}"#,
        query = escape(query),
        result = result,
    )
}

fn verdict_banner(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Fake => {
            r#"<h2 class="verdict-fake">FAKE</h2>
<div class="error">🚨 ALERT: FAKE NEWS DETECTED!</div>
<div class="banner banner-fake">
  <h1>⚠️ FAKE NEWS ALERT ⚠️</h1>
  <p>The system has high confidence that this information is misleading or fabricated.</p>
</div>"#
        }
        Verdict::Real => {
            r#"<h2 class="verdict-real">Real news</h2>
<div class="info">🟢 Likely Authentic News</div>
<div class="banner banner-real">
  <h1>✅ AUTHENTIC NEWS ✅</h1>
  <p>The system has high confidence that this information is credible and authentic.</p>
</div>"#
        }
        Verdict::Inconclusive => r#"<div class="info">⚠️ Analysis Completed</div>"#,
    }
}

fn detection_report(report: &DetectionReport) -> String {
    let analysis = &report.analysis;
    let confidence = analysis
        .confidence
        .map(|c| format!("<p><strong>Confidence:</strong> {}%</p>", c))
        .unwrap_or_default();

    let articles = if report.similar.is_empty() {
        "<p>No direct matches found in historical database.</p>".to_string()
    } else {
        report
            .similar
            .iter()
            .map(|a| {
                format!(
                    "<p><strong class=\"verdict-{}\">[{}]</strong> {}</p><p class=\"caption\">Subject: {}</p>",
                    escape(&a.label.to_lowercase()),
                    escape(&a.label),
                    escape(&a.title),
                    escape(&a.subject)
                )
            })
            .collect()
    };

    let entities = if report.entities.is_empty() {
        String::new()
    } else {
        let cells: String = report
            .entities
            .iter()
            .take(EVIDENCE_ENTITIES)
            .map(|e| {
                format!(
                    "<div class=\"info\">{} ({})</div>",
                    escape(&e.entity),
                    escape(&e.entity_type)
                )
            })
            .collect();
        format!(
            "<h4>Key Entities Mentioned in Context:</h4><div class=\"entities\">{}</div>",
            cells
        )
    };

    let trace = &report.trace;
    format!(
        r#"<h3>📊 Analysis Report</h3>
{banner}
{confidence}
<pre class="analysis">{raw}</pre>
<details>
  <summary>🔍 View Source Evidence from Graph</summary>
  {articles}
  {entities}
</details>
<p class="caption">Keyword: {keyword} · {found} articles · {entity_count} entities · {elapsed} ms</p>"#,
        banner = verdict_banner(analysis.verdict),
        confidence = confidence,
        raw = escape(&analysis.raw),
        articles = articles,
        entities = entities,
        keyword = escape(&trace.keyword),
        found = trace.articles_found,
        entity_count = trace.entities_found,
        elapsed = trace.elapsed_ms,
    )
}

/// What the graph page can show.
pub enum GraphPanel {
    Disconnected,
    Ready {
        counts: Vec<LabelCount>,
        /// Rendered vis-network page; `Ok(None)` when there were no mentions.
        graph: Result<Option<String>, String>,
    },
}

pub fn graph(panel: &GraphPanel) -> String {
    let header = "<h1>🕸️ Knowledge Graph Insights</h1>\n<p>This section visualizes the relationships between news articles and entities.</p>";

    let (counts, graph) = match panel {
        GraphPanel::Disconnected => {
            return format!(
                "{}\n<div class=\"error\">Connect to Neo4j to see graph statistics.</div>",
                header
            );
        }
        GraphPanel::Ready { counts, graph } => (counts, graph),
    };

    let metrics: String = counts
        .iter()
        .map(|c| metric(&c.label, usize::try_from(c.count).unwrap_or(0)))
        .collect();

    let view = match graph {
        Ok(Some(html)) => format!(
            "<iframe srcdoc=\"{}\" width=\"100%\" height=\"650\" style=\"border: none;\"></iframe>",
            escape(html)
        ),
        Ok(None) => "<div class=\"info\">No mentions found in the graph.</div>".to_string(),
        Err(e) => format!(
            "<div class=\"warning\">Could not render interactive graph: {}</div>",
            escape(e)
        ),
    };

    format!(
        r#"{header}
<h3>Graph Statistics</h3>
<div class="metrics">{metrics}</div>
<h3>Interactive Knowledge Graph</h3>
<p class="caption">Visualizing relationships between News Articles and Entities (Sample: Top 50 connections)</p>
{view}"#,
        header = header,
        metrics = metrics,
        view = view,
    )
}

pub fn about() -> String {
    r#"<h1>ℹ️ About GuardianAI</h1>
<p>GuardianAI is a fake news detection platform that combines:</p>
<ol>
  <li><strong>Neo4j Knowledge Graphs</strong>: Storing relationships between news, authors, and entities.</li>
  <li><strong>Keyword Graph Search</strong>: Finding past articles that share the claim's leading term.</li>
  <li><strong>Groq LLM</strong>: Processing context to provide human-like analysis and verdicts.</li>
</ol>
<p>Developed as part of the Fake News Detection project.</p>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use index::{EntityMention, SimilarArticle};
    use query::{Analysis, DetectionTrace};

    fn report(reply: &str, similar: Vec<SimilarArticle>, entities: usize) -> DetectionReport {
        DetectionReport {
            query: "q".to_string(),
            similar,
            entities: (0..entities)
                .map(|i| EntityMention {
                    entity: format!("Entity {}", i),
                    entity_type: "ORG".to_string(),
                    mention_count: 1,
                })
                .collect(),
            analysis: Analysis::parse(reply),
            trace: DetectionTrace {
                keyword: "q".to_string(),
                articles_found: 0,
                entities_found: entities,
                prompt_chars: 0,
                elapsed_ms: 5,
            },
        }
    }

    #[test]
    fn test_escape_and_thousands() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(44898), "44,898");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_layout_marks_active_page_and_status() {
        let down = Connection::Disconnected("refused".to_string());
        let html = layout(
            Page::Graph,
            &Sidebar { graph: &down, llm: &Connection::Connected },
            "<p>body</p>",
        );
        assert!(html.contains("<a href=\"/graph\" class=\"active\">Graph View</a>"));
        assert!(html.contains("Neo4j: Disconnected"));
        assert!(html.contains("Groq: Connected"));
        assert!(html.contains("GuardianAI © 2025"));
    }

    #[test]
    fn test_verdict_branches() {
        let fake = detection_report(&report("Verdict: FAKE", vec![], 0));
        assert!(fake.contains("FAKE NEWS ALERT"));

        let real = detection_report(&report("Verdict: REAL", vec![], 0));
        assert!(real.contains("AUTHENTIC NEWS"));
        assert!(!real.contains("FAKE NEWS ALERT"));

        let neither = detection_report(&report("Hard to say.", vec![], 0));
        assert!(neither.contains("Analysis Completed"));
        assert!(neither.contains("No direct matches found in historical database."));
    }

    #[test]
    fn test_evidence_caps_entities_and_escapes() {
        let similar = vec![SimilarArticle {
            id: "n1".to_string(),
            title: "<script>alert(1)</script>".to_string(),
            label: "FAKE".to_string(),
            subject: "News".to_string(),
            text: String::new(),
        }];
        let html = detection_report(&report("Verdict: REAL", similar, 8));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Subject: News"));
        assert!(html.contains("Entity 5 (ORG)"));
        assert!(!html.contains("Entity 6 (ORG)"));
    }

    #[test]
    fn test_graph_disconnected_notice() {
        let html = graph(&GraphPanel::Disconnected);
        assert!(html.contains("Connect to Neo4j to see graph statistics."));
    }

    #[test]
    fn test_dashboard_warning() {
        let html = dashboard(Err("cleaned_news.csv not found"));
        assert!(html.contains("Could not load analysis data"));
        assert!(html.contains("clean_data"));
    }
}
