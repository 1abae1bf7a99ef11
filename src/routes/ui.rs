//! Browser Search View
//!
//! A single self-contained page. Its script keeps the same four pieces of
//! state as [`crate::view::SearchView`] (query, results, loading, error) and
//! sequences overlapping searches with a generation counter.

use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Search Material Data</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 56rem; margin: 2rem auto; color: #1d1d1f; }
    h1 { text-align: center; }
    form { display: flex; justify-content: center; gap: 1rem; margin-bottom: 1.5rem; }
    input { width: 24rem; padding: 0.6rem; }
    button { padding: 0.6rem 1.4rem; }
    .error { text-align: center; color: #c00; }
    ul.results { list-style: none; padding: 0; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
  </style>
</head>
<body>
  <h1>Search Material Data</h1>

  <form id="searchForm">
    <input id="query" type="text"
      placeholder="Enter a compound or element (e.g. Cr, CrO3, CrO*). * are wildcards." />
    <button id="searchBtn" type="submit">Search</button>
  </form>

  <p id="error" class="error" hidden></p>

  <section id="resultsSection" hidden>
    <h2>Results:</h2>
    <ul id="results" class="results"></ul>
  </section>

  <script>
    const state = { query: '', results: [], loading: false, error: '' };
    let generation = 0;

    const form = document.getElementById('searchForm');
    const input = document.getElementById('query');
    const button = document.getElementById('searchBtn');
    const errorLine = document.getElementById('error');
    const resultsSection = document.getElementById('resultsSection');
    const resultsList = document.getElementById('results');

    input.addEventListener('input', (e) => { state.query = e.target.value; });

    function line(label, value) {
      const p = document.createElement('p');
      const strong = document.createElement('strong');
      strong.textContent = label + ': ';
      p.appendChild(strong);
      p.appendChild(document.createTextNode(value));
      return p;
    }

    function card(item) {
      const li = document.createElement('li');
      li.className = 'card';
      const title = document.createElement('h3');
      title.textContent = item.formula_pretty;
      li.appendChild(title);
      li.appendChild(line('Material ID', item.material_id));
      li.appendChild(line('Density', item.density + ' g/cm³'));
      li.appendChild(line('Volume', item.volume + ' Å³'));
      const sym = item.symmetry || {};
      li.appendChild(line('Symmetry', sym.crystal_system + ' (' + sym.symbol + ')'));

      const heading = document.createElement('h4');
      heading.textContent = 'Average Oxidation States:';
      li.appendChild(heading);
      const states = document.createElement('ul');
      for (const [element, value] of Object.entries(item.average_oxidation_states || {})) {
        const entry = document.createElement('li');
        const strong = document.createElement('strong');
        strong.textContent = element + ':';
        entry.appendChild(strong);
        entry.appendChild(document.createTextNode(' ' + value));
        states.appendChild(entry);
      }
      li.appendChild(states);
      return li;
    }

    function render() {
      button.disabled = state.loading;
      button.textContent = state.loading ? 'Loading...' : 'Search';
      errorLine.hidden = !state.error;
      errorLine.textContent = state.error;
      resultsSection.hidden = state.results.length === 0;
      resultsList.replaceChildren(...state.results.map(card));
    }

    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      if (!state.query.trim()) {
        state.error = 'Please enter a search term.';
        render();
        return;
      }

      const ticket = ++generation;
      state.loading = true;
      state.error = '';
      render();

      try {
        const res = await fetch('/api/oxidation-state?query=' + encodeURIComponent(state.query));
        const body = await res.json();
        if (!res.ok) {
          console.log(body.error);
          throw new Error('Failed to fetch data.');
        }
        if (ticket === generation) {
          state.results = Array.isArray(body.data) ? body.data : [];
        }
      } catch (err) {
        if (ticket === generation) {
          state.error = err.message;
        }
      } finally {
        if (ticket === generation) {
          state.loading = false;
        }
        render();
      }
    });

    render();
  </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_index_serves_search_page() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/oxidation-state?query="));
        assert!(page.contains("Please enter a search term."));
    }
}
