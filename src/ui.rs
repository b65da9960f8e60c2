use crate::models::MonthlySummary;
use std::fmt::Write;

pub fn render_index(summary: &MonthlySummary, feeds: &[String]) -> String {
    let month = summary.month.to_string();
    INDEX_HTML
        .replace("{{MONTH}}", &month)
        .replace("{{SUNDAYS}}", &summary.sundays.to_string())
        .replace("{{FEED_HEADERS}}", &feed_headers(feeds))
        .replace("{{ROWS}}", &rows(summary, feeds))
}

fn feed_headers(feeds: &[String]) -> String {
    feeds
        .iter()
        .map(|feed| format!("<th>{}</th>", escape(&feed_label(feed))))
        .collect()
}

fn rows(summary: &MonthlySummary, feeds: &[String]) -> String {
    if summary.rows.is_empty() {
        return format!(
            r#"<tr><td colspan="{}" class="empty">No employees found.</td></tr>"#,
            6 + feeds.len()
        );
    }

    let mut html = String::new();
    for (index, row) in summary.rows.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"name\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            index + 1,
            escape(&row.name),
            row.present,
            row.absent,
            row.halfday,
            row.casualleave,
        );
        for feed in feeds {
            let count = row.activity_counts.get(feed).copied().unwrap_or(0);
            let _ = write!(html, "<td>{count}</td>");
        }
        html.push_str("</tr>");
    }
    html
}

fn feed_label(feed: &str) -> String {
    match feed {
        "clickup" => "ClickUp".to_string(),
        "trackabi" => "Trackabi".to_string(),
        "workdone" => "Workdone".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Attendance Summary {{MONTH}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
      margin: 0;
    }

    .filters {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 16px;
    }

    .filters input {
      font: inherit;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .filters button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 999px;
      padding: 8px 18px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .sundays {
      margin: 0;
      color: #5f5c57;
    }

    .sundays strong {
      color: var(--accent-2);
    }

    .table-card {
      background: white;
      border-radius: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      overflow-x: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      padding: 12px 14px;
      text-align: center;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    td.name {
      text-align: left;
      font-weight: 500;
    }

    td.empty {
      color: #6f6a65;
      padding: 28px;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 18px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>Employee Attendance Summary</h1>

    <form class="filters" method="get" action="/">
      <label>Filter by month
        <input type="month" name="month" value="{{MONTH}}" />
      </label>
      <button type="submit">Show</button>
    </form>

    <p class="sundays">Number of Sundays in {{MONTH}}: <strong>{{SUNDAYS}}</strong></p>

    <section class="table-card">
      <table>
        <thead>
          <tr>
            <th>S.No</th>
            <th>Name</th>
            <th>Present</th>
            <th>Absent</th>
            <th>Half Day</th>
            <th>Casual Leave</th>
            {{FEED_HEADERS}}
          </tr>
        </thead>
        <tbody>
          {{ROWS}}
        </tbody>
      </table>
    </section>
  </main>
</body>
</html>
"#;
