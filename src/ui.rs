use crate::refresh::RefreshStatus;

pub fn render_index(refresh: &RefreshStatus) -> String {
    INDEX_HTML
        .replace("{{REFRESH_CHECKED}}", if refresh.enabled { "checked" } else { "" })
        .replace("{{REFRESH_SECS}}", &refresh.interval_secs.to_string())
        .replace("{{GENERATION}}", &refresh.generation.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Environmental Pollution Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef4ee;
      --bg-2: #cfe3d6;
      --ink: #25302b;
      --muted: #6b756f;
      --accent: #2f6f4e;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f4f8f2 60%, #f9fbf7 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 300px 1fr;
      gap: 24px;
      padding: 24px;
    }

    aside,
    .app {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    aside {
      align-self: start;
      position: sticky;
      top: 24px;
      display: grid;
      gap: 18px;
    }

    aside h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .field {
      display: grid;
      gap: 6px;
    }

    .field > span {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .field input[type="date"],
    .field input[type="number"],
    select {
      font: inherit;
      padding: 6px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
    }

    .city-list {
      display: grid;
      gap: 4px;
      max-height: 220px;
      overflow-y: auto;
    }

    .range {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 8px;
    }

    .app {
      display: grid;
      gap: 24px;
      min-width: 0;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 3.5vw, 2.6rem);
      margin: 0;
    }

    h3 {
      margin: 0 0 12px;
      font-size: 1.15rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value[data-tone="normal"] { color: #2d7a4b; }
    .stat .value[data-tone="off"] { color: #8a7a12; }
    .stat .value[data-tone="inverse"] { color: #c63b2b; }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(340px, 1fr));
      gap: 16px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      min-width: 0;
    }

    .chart-card svg {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .chart-grid { stroke: rgba(47, 72, 88, 0.12); }
    .chart-label { fill: #7a746d; font-size: 11px; }
    .chart-line { fill: none; stroke-width: 2.5; }
    .chart-point { fill: white; stroke-width: 2; }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .legend i {
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 4px;
    }

    .notices {
      display: grid;
      gap: 8px;
    }

    .notice {
      padding: 12px 16px;
      border-radius: 14px;
      font-size: 0.95rem;
    }

    .notice[data-level="error"] { background: #fde4e1; color: #8f2417; }
    .notice[data-level="warning"] { background: #fff4d6; color: #7a5a00; }
    .notice[data-level="info"] { background: #e3eefc; color: #1f4f8a; }

    .table-wrap {
      overflow-x: auto;
      max-height: 420px;
    }

    table {
      border-collapse: collapse;
      width: 100%;
      font-size: 0.9rem;
    }

    th,
    td {
      padding: 6px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
      text-align: right;
      white-space: nowrap;
    }

    th:first-child,
    td:first-child {
      text-align: left;
    }

    th {
      position: sticky;
      top: 0;
      background: white;
      color: var(--muted);
      font-weight: 600;
    }

    details summary {
      cursor: pointer;
      font-weight: 600;
    }

    .overview {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
      margin-top: 12px;
    }

    .download {
      display: inline-block;
      margin-top: 12px;
      padding: 10px 18px;
      border-radius: 999px;
      background: var(--accent);
      color: white;
      text-decoration: none;
      font-weight: 600;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.85rem;
    }

    [hidden] {
      display: none !important;
    }

    @keyframes rise {
      from { opacity: 0; transform: translateY(18px); }
      to { opacity: 1; transform: translateY(0); }
    }

    @media (max-width: 900px) {
      body { grid-template-columns: 1fr; }
      aside { position: static; }
    }
  </style>
</head>
<body>
  <aside>
    <h2>Filters</h2>

    <form id="refresh-form" method="post" action="/refresh/toggle">
      <label>
        <input id="refresh-toggle" type="checkbox" {{REFRESH_CHECKED}} />
        Enable Auto-Refresh (<span id="refresh-secs">{{REFRESH_SECS}}</span>s)
      </label>
      <noscript><button type="submit">Toggle</button></noscript>
    </form>

    <div class="field">
      <span>Select City</span>
      <div id="city-list" class="city-list"></div>
    </div>

    <div class="field" id="date-field">
      <span>Select Date Range</span>
      <div id="date-range" class="range">
        <input id="start-date" type="date" />
        <input id="end-date" type="date" />
      </div>
      <p id="date-single" class="hint" hidden></p>
    </div>

    <div class="field">
      <span>Select AQI Range</span>
      <div class="range">
        <input id="aqi-min" type="number" min="0" max="500" step="1" />
        <input id="aqi-max" type="number" min="0" max="500" step="1" />
      </div>
    </div>
  </aside>

  <main class="app">
    <header>
      <h1>Environmental Pollution Dashboard</h1>
      <p class="subtitle">Analyze air quality trends, pollution levels, and environmental factors across different cities.</p>
    </header>

    <section id="notices" class="notices"></section>

    <details id="overview" hidden>
      <summary>Dataset Overview</summary>
      <div class="overview">
        <div class="chart-card">
          <h3>Raw Data Preview</h3>
          <div class="table-wrap" id="preview-table"></div>
        </div>
        <div class="chart-card">
          <h3>Statistical Summary</h3>
          <div class="table-wrap" id="summary-table"></div>
        </div>
      </div>
    </details>

    <section id="kpis" hidden>
      <h3>Key Performance Indicators</h3>
      <div class="panel">
        <div class="stat"><span class="label">Avg AQI</span><span id="kpi-avg" class="value">--</span></div>
        <div class="stat"><span class="label">Highest PM2.5</span><span id="kpi-pm25" class="value">--</span></div>
        <div class="stat"><span class="label">Lowest Humidity</span><span id="kpi-humidity" class="value">--</span></div>
        <div class="stat"><span class="label">Overall Status</span><span id="kpi-status" class="value">--</span></div>
      </div>
    </section>

    <section id="charts" hidden>
      <div class="charts">
        <div class="chart-card">
          <h3>Average AQI by City</h3>
          <svg id="bar-chart" viewBox="0 0 600 280" role="img" aria-label="Average AQI by city"></svg>
        </div>
        <div class="chart-card">
          <h3>PM2.5 vs Temperature</h3>
          <svg id="scatter-chart" viewBox="0 0 600 280" role="img" aria-label="PM2.5 against temperature"></svg>
          <div id="scatter-legend" class="legend"></div>
        </div>
      </div>

      <div class="chart-card" style="margin-top: 16px">
        <div class="chart-header">
          <h3 id="line-title">Pollution Trends Over Time</h3>
          <label class="field">
            <span>Select Pollutant for Trend</span>
            <select id="pollutant"></select>
          </label>
        </div>
        <svg id="line-chart" viewBox="0 0 600 280" role="img" aria-label="Pollutant trend"></svg>
        <div id="line-legend" class="legend"></div>
      </div>

      <div class="chart-card" id="map-card" style="margin-top: 16px" hidden>
        <h3>Pollution Map</h3>
        <svg id="map-chart" viewBox="0 0 600 320" role="img" aria-label="Pollution map"></svg>
      </div>
    </section>

    <section id="table-section" hidden>
      <h3>Filtered Data with AQI Indicators</h3>
      <div class="chart-card">
        <div class="table-wrap" id="data-table"></div>
      </div>
      <a id="download" class="download" href="/api/export">Download CSV</a>
    </section>

    <section id="insights" hidden>
      <h3>Insights</h3>
      <div class="notice" data-level="info" id="insight-text"></div>
    </section>

    <p class="hint">Filters are applied on the server. The dataset is read once per process.</p>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const SVG_W = 600;
    const SVG_H = 280;
    const PAD_X = 48;
    const PAD_Y = 34;
    const TOP = 20;

    let controls = null;
    let generation = {{GENERATION}};
    let waiting = false;

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => ({
        '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
      })[ch]);

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    const formatStat = (value) =>
      value === null || value === undefined ? '--' : (Math.round(value * 1000) / 1000).toString();

    const scaleLinear = (min, max, outMin, outMax) => {
      if (min === max) {
        min -= 1;
        max += 1;
      }
      return (value) => outMin + ((value - min) * (outMax - outMin)) / (max - min);
    };

    const yGrid = (min, max, y) => {
      let grid = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + ((max - min) * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${PAD_X}" y1="${yPos}" x2="${SVG_W - PAD_X}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${PAD_X - 8}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }
      return grid;
    };

    const legend = (el, entries) => {
      el.innerHTML = entries
        .map((entry) => `<span><i style="background:${entry.color}"></i>${escapeHtml(entry.city)}</span>`)
        .join('');
    };

    const renderBarChart = (chart) => {
      const el = $('bar-chart');
      const bars = chart.bars;
      const max = Math.max(...bars.map((bar) => bar.avg_aqi), 0);
      const y = scaleLinear(0, max, SVG_H - PAD_Y, TOP);
      const slot = (SVG_W - PAD_X * 2) / bars.length;
      const width = Math.min(60, slot * 0.7);

      const rects = bars
        .map((bar, index) => {
          const x = PAD_X + slot * index + (slot - width) / 2;
          const top = y(bar.avg_aqi);
          return `<rect x="${x}" y="${top}" width="${width}" height="${SVG_H - PAD_Y - top}" rx="6" fill="${bar.color}">` +
            `<title>${escapeHtml(bar.city)}: ${bar.avg_aqi.toFixed(1)}</title></rect>` +
            `<text class="chart-label" x="${x + width / 2}" y="${SVG_H - PAD_Y + 16}" text-anchor="middle">${escapeHtml(bar.city)}</text>`;
        })
        .join('');

      el.innerHTML = `${yGrid(0, max || 1, y)}${rects}`;
    };

    const reading = (value, unit) => (value === null ? '--' : `${value}${unit}`);

    const renderScatterChart = (chart) => {
      const el = $('scatter-chart');
      const points = chart.points.filter((p) => Number.isFinite(p.temperature) && Number.isFinite(p.pm25));
      if (!points.length) {
        el.innerHTML = '';
        return;
      }
      const xs = points.map((p) => p.temperature);
      const ys = points.map((p) => p.pm25);
      const xMin = Math.min(...xs);
      const xMax = Math.max(...xs);
      const yMin = Math.min(...ys, 0);
      const yMax = Math.max(...ys);
      const x = scaleLinear(xMin, xMax, PAD_X + 10, SVG_W - PAD_X - 10);
      const y = scaleLinear(yMin, yMax, SVG_H - PAD_Y, TOP);

      const dots = points
        .map((p) =>
          `<circle cx="${x(p.temperature)}" cy="${y(p.pm25)}" r="${p.diameter / 2}" fill="${p.color}" fill-opacity="0.7">` +
          `<title>${escapeHtml(p.city)}\nTemperature: ${p.temperature}\nPM2.5: ${p.pm25}\nAQI: ${p.aqi}\nHumidity: ${p.humidity}</title></circle>`)
        .join('');

      const xLabels = [xMin, (xMin + xMax) / 2, xMax]
        .map((value) => `<text class="chart-label" x="${x(value)}" y="${SVG_H - PAD_Y + 16}" text-anchor="middle">${formatAxisValue(value)}</text>`)
        .join('');

      el.innerHTML = `${yGrid(yMin, yMax, y)}${dots}${xLabels}`;

      const seen = new Map();
      points.forEach((p) => seen.set(p.city, p.color));
      legend($('scatter-legend'), Array.from(seen, ([city, color]) => ({ city, color })));
    };

    const renderLineChart = (chart) => {
      const el = $('line-chart');
      $('line-title').textContent = chart.title;
      const plotted = chart.series.map((s) => ({ ...s, points: s.points.filter((p) => Number.isFinite(p.value)) }));
      const all = plotted.flatMap((s) => s.points);
      if (!all.length) {
        el.innerHTML = '';
        return;
      }
      const times = all.map((p) => Date.parse(p.date));
      const values = all.map((p) => p.value);
      const tMin = Math.min(...times);
      const tMax = Math.max(...times);
      const vMin = Math.min(...values, 0);
      const vMax = Math.max(...values);
      const x = scaleLinear(tMin, tMax, PAD_X, SVG_W - PAD_X);
      const y = scaleLinear(vMin, vMax, SVG_H - PAD_Y, TOP);

      const lines = plotted
        .map((series) => {
          const path = series.points
            .map((p, index) => `${index === 0 ? 'M' : 'L'} ${x(Date.parse(p.date)).toFixed(2)} ${y(p.value).toFixed(2)}`)
            .join(' ');
          const markers = chart.markers
            ? series.points
                .map((p) => `<circle class="chart-point" stroke="${series.color}" cx="${x(Date.parse(p.date))}" cy="${y(p.value)}" r="3.5"><title>${escapeHtml(series.city)} ${p.date}: ${p.value}</title></circle>`)
                .join('')
            : '';
          return `<path class="chart-line" stroke="${series.color}" d="${path}" />${markers}`;
        })
        .join('');

      const dates = Array.from(new Set(all.map((p) => p.date))).sort();
      const labelEvery = Math.max(1, Math.ceil(dates.length / 8));
      const xLabels = dates
        .filter((_, index) => index % labelEvery === 0)
        .map((date) => `<text class="chart-label" x="${x(Date.parse(date))}" y="${SVG_H - PAD_Y + 16}" text-anchor="middle">${date.slice(5)}</text>`)
        .join('');

      el.innerHTML = `${yGrid(vMin, vMax, y)}${lines}${xLabels}`;
      legend($('line-legend'), chart.series);
    };

    const renderMap = (map) => {
      const card = $('map-card');
      if (!map || !map.points.length) {
        card.hidden = true;
        return;
      }
      card.hidden = false;
      const width = 600;
      const height = 320;
      const lats = map.points.map((p) => p.latitude);
      const lons = map.points.map((p) => p.longitude);
      const x = scaleLinear(Math.min(...lons), Math.max(...lons), 30, width - 30);
      const y = scaleLinear(Math.min(...lats), Math.max(...lats), height - 30, 30);
      $('map-chart').innerHTML = map.points
        .map((p) =>
          `<circle cx="${x(p.longitude)}" cy="${y(p.latitude)}" r="${map.size / 2}" fill="${map.color}" fill-opacity="0.55">` +
          `<title>${escapeHtml(p.city)} (${p.latitude}, ${p.longitude}) AQI ${p.aqi}</title></circle>`)
        .join('');
    };

    const renderTable = (el, columns, rows) => {
      const head = columns.map((c) => `<th>${escapeHtml(c)}</th>`).join('');
      const body = rows.map((cells) => `<tr>${cells.join('')}</tr>`).join('');
      el.innerHTML = `<table><thead><tr>${head}</tr></thead><tbody>${body}</tbody></table>`;
    };

    const renderStyledTable = (table) => {
      const rows = table.rows.map((row) =>
        row.cells.map((cell, index) => {
          if (index !== table.aqi_column) {
            return `<td>${escapeHtml(cell)}</td>`;
          }
          const style = row.aqi_style;
          return `<td style="background-color:${style.background};color:${style.color}">${escapeHtml(cell)}</td>`;
        }));
      renderTable($('data-table'), table.columns, rows);
    };

    const renderOverview = (overview) => {
      const el = $('overview');
      if (!overview) {
        el.hidden = true;
        return;
      }
      el.hidden = false;
      const previewColumns = ['City', 'Date', 'AQI', 'PM2.5', 'PM10', 'NO2', 'SO2', 'Temperature', 'Humidity'];
      renderTable(
        $('preview-table'),
        previewColumns,
        overview.preview.map((record) => previewColumns.map((c) => `<td>${escapeHtml(record[c] ?? '')}</td>`))
      );
      const stats = ['count', 'mean', 'std', 'min', 'p25', 'p50', 'p75', 'max'];
      const labels = { p25: '25%', p50: '50%', p75: '75%' };
      renderTable(
        $('summary-table'),
        [''].concat(overview.summary.map((c) => c.column)),
        stats.map((stat) =>
          [`<td>${labels[stat] || stat}</td>`].concat(
            overview.summary.map((c) => `<td>${formatStat(c[stat])}</td>`)
          ))
      );
    };

    const renderNotices = (notices) => {
      $('notices').innerHTML = notices
        .map((n) => `<div class="notice" data-level="${n.level}">${escapeHtml(n.message)}</div>`)
        .join('');
    };

    const renderControls = (data) => {
      if (controls || !data.controls) {
        return;
      }
      controls = data.controls;

      $('city-list').innerHTML = controls.cities
        .map((city) => `<label><input type="checkbox" name="city" value="${escapeHtml(city)}" checked /> ${escapeHtml(city)}</label>`)
        .join('');

      const selector = controls.date_selector;
      if (selector.kind === 'single') {
        $('date-range').hidden = true;
        $('date-single').hidden = false;
        $('date-single').textContent = `Date available: ${selector.date}`;
      } else {
        ['start-date', 'end-date'].forEach((id) => {
          $(id).min = selector.min;
          $(id).max = selector.max;
        });
        $('start-date').value = selector.min;
        $('end-date').value = selector.max;
      }

      $('aqi-min').value = controls.aqi_default[0];
      $('aqi-max').value = controls.aqi_default[1];
      $('aqi-min').min = $('aqi-max').min = controls.aqi_range[0];
      $('aqi-min').max = $('aqi-max').max = controls.aqi_range[1];

      $('pollutant').innerHTML = controls.pollutants
        .map((p) => `<option value="${p}">${p}</option>`)
        .join('');
      $('pollutant').value = data.pollutant;
    };

    const buildQuery = () => {
      const params = new URLSearchParams();
      if (!controls) {
        return params;
      }
      const cities = Array.from(document.querySelectorAll('input[name="city"]:checked')).map((el) => el.value);
      if (cities.length === 0) params.append('cities', '');
      cities.forEach((city) => params.append('cities', city));
      if (controls.date_selector.kind === 'range') {
        const start = $('start-date').value;
        const end = $('end-date').value;
        if (start && end) {
          params.set('start', start);
          params.set('end', end);
        }
      }
      if ($('aqi-min').value !== '') params.set('aqi_min', $('aqi-min').value);
      if ($('aqi-max').value !== '') params.set('aqi_max', $('aqi-max').value);
      params.set('pollutant', $('pollutant').value || 'AQI');
      return params;
    };

    const show = (id, visible) => {
      $(id).hidden = !visible;
    };

    const render = async () => {
      const query = buildQuery().toString();
      const res = await fetch(`/api/dashboard?${query}`);
      if (!res.ok) {
        renderNotices([{ level: 'error', message: (await res.text()) || 'Request failed' }]);
        return;
      }
      const data = await res.json();
      renderControls(data);
      renderNotices(data.notices);
      renderOverview(data.overview);

      show('kpis', !!data.kpis);
      if (data.kpis) {
        $('kpi-avg').textContent = data.kpis.avg_aqi.toFixed(1);
        $('kpi-avg').dataset.tone = data.kpis.status_tone;
        $('kpi-pm25').textContent = reading(data.kpis.max_pm25, ' µg/m³');
        $('kpi-humidity').textContent = reading(data.kpis.min_humidity, '%');
        $('kpi-status').textContent = data.kpis.status_label;
        $('kpi-status').dataset.tone = data.kpis.status_tone;
      }

      show('charts', !!data.charts);
      if (data.charts) {
        renderBarChart(data.charts.bar);
        renderScatterChart(data.charts.scatter);
        renderLineChart(data.charts.line);
        renderMap(data.charts.map);
      }

      show('table-section', !!data.table);
      if (data.table) {
        renderStyledTable(data.table);
        $('download').href = `/api/export?${buildQuery().toString()}`;
      }

      show('insights', !!data.insight);
      if (data.insight) {
        $('insight-text').innerHTML =
          `The most polluted city in this selection is <strong>${escapeHtml(data.insight.highest_city)}</strong>. ` +
          `<strong>${escapeHtml(data.insight.lowest_city)}</strong> has the cleanest air currently.`;
      }

      if (data.refresh) {
        applyRefresh(data.refresh);
      }
    };

    const applyRefresh = (status) => {
      $('refresh-toggle').checked = status.enabled;
      $('refresh-secs').textContent = status.interval_secs;
      if (status.enabled) {
        waitForTick();
      }
    };

    const waitForTick = async () => {
      if (waiting) {
        return;
      }
      waiting = true;
      try {
        while ($('refresh-toggle').checked) {
          const res = await fetch(`/api/refresh/wait?since=${generation}`);
          if (!res.ok) {
            break;
          }
          const status = await res.json();
          if (!status.enabled) {
            $('refresh-toggle').checked = false;
            break;
          }
          if (status.generation > generation) {
            generation = status.generation;
            await render();
          }
        }
      } finally {
        waiting = false;
      }
    };

    $('refresh-toggle').addEventListener('change', async (event) => {
      const res = await fetch('/api/refresh', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ enabled: event.target.checked })
      });
      if (res.ok) {
        const status = await res.json();
        generation = status.generation;
        applyRefresh(status);
      }
    });

    $('refresh-form').addEventListener('submit', (event) => event.preventDefault());

    document.querySelector('aside').addEventListener('change', (event) => {
      if (event.target.id !== 'refresh-toggle') {
        render();
      }
    });
    $('pollutant').addEventListener('change', () => render());

    render().catch((err) => renderNotices([{ level: 'error', message: err.message }]));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::RefreshState;

    #[test]
    fn index_reflects_refresh_flag() {
        let status = RefreshStatus {
            enabled: true,
            state: RefreshState::On,
            interval_secs: 60,
            generation: 3,
        };
        let html = render_index(&status);
        assert!(html.contains(r#"id="refresh-toggle" type="checkbox" checked"#));
        assert!(html.contains("let generation = 3;"));
        assert!(!html.contains("{{"));
    }
}
