use crate::models::{InfoPanel, Snapshot};

pub fn render_index(snapshot: &Snapshot) -> String {
    let history = snapshot
        .history_lines
        .iter()
        .map(|line| format!("<li>{}</li>", escape(line)))
        .collect::<String>();
    let panel_options = InfoPanel::ALL
        .iter()
        .map(|panel| {
            let selected = if *panel == snapshot.panel { " selected" } else { "" };
            format!("<option value=\"{panel}\"{selected}>{}</option>", panel_title(*panel))
        })
        .collect::<String>();
    let panels = InfoPanel::ALL
        .iter()
        .map(|panel| {
            let hidden = if *panel == snapshot.panel { "" } else { " hidden" };
            format!(
                "<div class=\"tab-panel\" id=\"{panel}\"{hidden}>{}</div>",
                panel_body(*panel)
            )
        })
        .collect::<String>();

    INDEX_HTML
        .replace("{{BODY_CLASS}}", if snapshot.dark_mode { "dark" } else { "" })
        .replace("{{DARK_CHECKED}}", if snapshot.dark_mode { "checked" } else { "" })
        .replace("{{STEPS}}", &snapshot.step_count.to_string())
        .replace("{{CALORIES}}", &snapshot.calories)
        .replace("{{DISTANCE}}", &snapshot.distance_km)
        .replace("{{TIME}}", &snapshot.active_time)
        .replace("{{GOAL}}", &snapshot.goal.to_string())
        .replace("{{PERCENT}}", &format!("{:.1}", snapshot.progress_percent))
        .replace("{{MOTIVATION}}", &escape(&snapshot.motivation))
        .replace("{{BADGES}}", &escape(&snapshot.badge_text))
        .replace("{{HISTORY}}", &history)
        .replace("{{PANEL_OPTIONS}}", &panel_options)
        .replace("{{PANELS}}", &panels)
        .replace("{{VERSION}}", &snapshot.version.to_string())
}

fn panel_title(panel: InfoPanel) -> &'static str {
    match panel {
        InfoPanel::Benefits => "Why walk?",
        InfoPanel::Tips => "Tips",
        InfoPanel::Safety => "Safety",
    }
}

fn panel_body(panel: InfoPanel) -> &'static str {
    match panel {
        InfoPanel::Benefits => {
            "<p>Regular walking strengthens the heart, lifts mood and helps keep weight in check.</p>"
        }
        InfoPanel::Tips => {
            "<p>Take the stairs, walk during calls and park a little further away. Small detours add up.</p>"
        }
        InfoPanel::Safety => {
            "<p>Keep your phone in a pocket close to the body for steadier counts, and watch the road, not the screen.</p>"
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Step Counter</title>
  <style>
    :root {
      --bg: #f3f7f1;
      --ink: #22302a;
      --muted: #6a7a70;
      --accent: #4caf50;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(34, 48, 42, 0.12);
    }

    body.dark {
      --bg: #141a17;
      --ink: #e4ede7;
      --muted: #93a39a;
      --card: #1f2723;
      --shadow: 0 18px 40px rgba(0, 0, 0, 0.4);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 28px 16px 40px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 14px;
    }

    .stat {
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(76, 175, 80, 0.2);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .progress {
      height: 16px;
      border-radius: 999px;
      background: rgba(76, 175, 80, 0.15);
      overflow: hidden;
    }

    #progressFill {
      height: 100%;
      background: var(--accent);
      transition: width 300ms ease;
    }

    .motivation {
      min-height: 1.2em;
      font-weight: 600;
    }

    .badges {
      min-height: 1.2em;
      color: #c48a00;
    }

    form.goal {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
    }

    input[type="number"], select {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid rgba(76, 175, 80, 0.4);
      background: transparent;
      color: inherit;
      font-size: 1rem;
    }

    button, .button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
    }

    #stepHistory {
      margin: 0;
      padding-left: 18px;
      max-height: 180px;
      overflow-y: auto;
    }

    #stepChart {
      width: 100%;
      height: 220px;
      display: block;
    }

    .chart-bar {
      fill: rgba(76, 175, 80, 0.6);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 10px;
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      min-height: 1.2em;
    }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <main class="app">
    <header>
      <h1>Step Counter</h1>
      <label><input type="checkbox" id="darkModeToggle" {{DARK_CHECKED}} /> Dark mode</label>
    </header>

    <section class="stats">
      <div class="stat"><span class="label">Steps</span><span class="value" id="stepCount">{{STEPS}}</span></div>
      <div class="stat"><span class="label">Calories</span><span class="value" id="calories">{{CALORIES}}</span></div>
      <div class="stat"><span class="label">Distance (km)</span><span class="value" id="distance">{{DISTANCE}}</span></div>
      <div class="stat"><span class="label">Active time</span><span class="value" id="time">{{TIME}}</span></div>
    </section>

    <section>
      <p>Goal: <strong id="goal">{{GOAL}}</strong> steps</p>
      <div class="progress"><div id="progressFill" style="width: {{PERCENT}}%"></div></div>
      <p class="motivation" id="motivation">{{MOTIVATION}}</p>
      <p class="badges" id="badges">{{BADGES}}</p>
      <form class="goal" id="goalForm" method="post" action="/goal">
        <input type="number" id="goalInput" name="goal" min="1" placeholder="New daily goal" />
        <button type="submit">Set goal</button>
      </form>
    </section>

    <section>
      <h2>History</h2>
      <ul id="stepHistory">{{HISTORY}}</ul>
      <svg id="stepChart" viewBox="0 0 600 220" role="img" aria-label="Steps per day"></svg>
      <a class="button" href="/export/step_history.csv" download="step_history.csv">Export CSV</a>
    </section>

    <section>
      <select id="infoSelect">{{PANEL_OPTIONS}}</select>
      {{PANELS}}
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const el = (id) => document.getElementById(id);
    const statusEl = el('status');
    const chartEl = el('stepChart');
    const panels = Array.from(document.querySelectorAll('.tab-panel'));
    const FLUSH_MS = 250;
    let pending = [];
    let lastVersion = {{VERSION}};

    const setStatus = (message) => {
      statusEl.textContent = message;
    };

    const post = async (path, body) => {
      const res = await fetch(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const renderChart = (chart) => {
      if (!chart.values.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No history yet</text>';
        return;
      }
      const width = 600;
      const height = 220;
      const pad = 30;
      const max = Math.max(...chart.values, 1);
      const slot = (width - pad * 2) / chart.values.length;
      const barWidth = Math.max(slot * 0.7, 2);
      const scale = (height - pad * 2) / max;
      chartEl.innerHTML = chart.values
        .map((value, index) => {
          const x = pad + index * slot + (slot - barWidth) / 2;
          const h = value * scale;
          const y = height - pad - h;
          const label = chart.labels[index].slice(5);
          return `<rect class="chart-bar" x="${x}" y="${y}" width="${barWidth}" height="${h}"><title>${value}</title></rect>` +
            `<text class="chart-label" x="${x + barWidth / 2}" y="${height - pad + 14}" text-anchor="middle">${label}</text>`;
        })
        .join('');
    };

    const apply = (snapshot) => {
      lastVersion = snapshot.version;
      el('stepCount').textContent = snapshot.step_count;
      el('calories').textContent = snapshot.calories;
      el('distance').textContent = snapshot.distance_km;
      el('time').textContent = snapshot.active_time;
      el('goal').textContent = snapshot.goal;
      el('progressFill').style.width = snapshot.progress_percent + '%';
      el('motivation').textContent = snapshot.motivation;
      el('badges').textContent = snapshot.badge_text;
      document.body.classList.toggle('dark', snapshot.dark_mode);
      el('darkModeToggle').checked = snapshot.dark_mode;
      const list = el('stepHistory');
      list.innerHTML = '';
      snapshot.history_lines.forEach((line) => {
        const li = document.createElement('li');
        li.textContent = line;
        list.appendChild(li);
      });
      renderChart(snapshot.chart);
      el('infoSelect').value = snapshot.panel;
      panels.forEach((panel) => {
        panel.hidden = panel.id !== snapshot.panel;
      });
    };

    const onMotion = (event) => {
      const acc = event.accelerationIncludingGravity;
      if (!acc || acc.x === null || acc.y === null || acc.z === null) {
        return;
      }
      pending.push({ x: acc.x, y: acc.y, z: acc.z, timestamp_ms: Date.now() });
    };

    const flush = async () => {
      if (pending.length) {
        const samples = pending;
        pending = [];
        try {
          apply(await post('/api/motion', { samples }));
        } catch (err) {
          setStatus(err.message);
        }
      }
      setTimeout(flush, FLUSH_MS);
    };

    const startTracking = async () => {
      let granted = true;
      if (typeof DeviceMotionEvent !== 'undefined' && typeof DeviceMotionEvent.requestPermission === 'function') {
        try {
          granted = (await DeviceMotionEvent.requestPermission()) === 'granted';
        } catch (err) {
          granted = false;
        }
      } else if (typeof DeviceMotionEvent === 'undefined') {
        granted = false;
      }
      apply(await post('/api/permission', { granted }));
      if (granted) {
        window.addEventListener('devicemotion', onMotion);
        flush();
      } else {
        setStatus('Motion access unavailable; counting is paused.');
      }
    };

    const watch = async () => {
      for (;;) {
        try {
          const query = lastVersion === null ? '' : `?since=${lastVersion}`;
          const res = await fetch(`/api/state/next${query}`);
          if (res.ok) {
            apply(await res.json());
          } else {
            await new Promise((resolve) => setTimeout(resolve, 5000));
          }
        } catch (err) {
          await new Promise((resolve) => setTimeout(resolve, 5000));
        }
      }
    };

    el('goalForm').addEventListener('submit', (event) => {
      event.preventDefault();
      post('/api/goal', { goal: el('goalInput').value })
        .then(apply)
        .catch((err) => setStatus(err.message));
    });

    el('darkModeToggle').addEventListener('change', (event) => {
      post('/api/dark-mode', { enabled: event.target.checked })
        .then(apply)
        .catch((err) => setStatus(err.message));
    });

    el('infoSelect').addEventListener('change', (event) => {
      post('/api/panel', { panel: event.target.value })
        .then(apply)
        .catch((err) => setStatus(err.message));
    });

    fetch('/api/state')
      .then((res) => res.json())
      .then(apply)
      .catch((err) => setStatus(err.message));
    startTracking().catch((err) => setStatus(err.message));
    watch();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StepTuning;
    use crate::models::{Dashboard, HistoryEntry};
    use crate::view::build_snapshot;

    #[test]
    fn page_shows_counts_and_one_visible_panel() {
        let mut dashboard = Dashboard::with_goal(1000);
        dashboard.counter.step_count = 500;
        dashboard.dark_mode = true;
        dashboard.panel = InfoPanel::Tips;
        dashboard.history = vec![HistoryEntry { date: "2026-10-15".into(), steps: 42 }];
        let html = render_index(&build_snapshot(&dashboard, &StepTuning::default(), 0));

        assert!(html.contains(r#"<body class="dark">"#));
        assert!(html.contains(r#"id="stepCount">500<"#));
        assert!(html.contains("width: 50.0%"));
        assert!(html.contains("Halfway to your goal!"));
        assert!(html.contains("<li>2026-10-15: 42 steps</li>"));
        assert!(html.contains(r#"<div class="tab-panel" id="tips">"#));
        assert!(html.contains(r#"<div class="tab-panel" id="benefits" hidden>"#));
        assert!(html.contains(r#"<div class="tab-panel" id="safety" hidden>"#));
        assert!(html.contains("let lastVersion = 0;"));
        assert!(!html.contains("{{"));
    }
}
