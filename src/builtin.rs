pub const BUILTIN_CSS: &str = include_str!("builtin.css");

/// View-time glue embedded in the emitted page. It replays the same
/// decisions the Rust side makes at build time: the tri-state theme cycle
/// keyed on `site_theme`, and click interception for anchors whose target
/// id exists.
pub const PAGE_JS: &str = r##"(function () {
  var themeKey = "site_theme";
  var root = document.documentElement;

  function systemTheme() {
    try {
      return window.matchMedia && window.matchMedia("(prefers-color-scheme: dark)").matches
        ? "dark"
        : "light";
    } catch (_) {
      return "light";
    }
  }

  function stored() {
    try {
      var v = localStorage.getItem(themeKey);
      return v === "dark" || v === "light" || v === "system" ? v : "system";
    } catch (_) {
      return "system";
    }
  }

  function apply(pref) {
    var effective = pref === "system" ? systemTheme() : pref;
    root.setAttribute("data-theme", effective);
    if (pref === "system") {
      root.removeAttribute("data-user-theme");
    } else {
      root.setAttribute("data-user-theme", effective);
    }
    var btn = document.querySelector(".theme-toggle button");
    if (btn) btn.setAttribute("aria-pressed", effective === "dark" ? "true" : "false");
  }

  var btn = document.querySelector(".theme-toggle button");
  if (btn) {
    btn.addEventListener("click", function () {
      var cur = stored();
      var next = cur === "system" ? "dark" : cur === "dark" ? "light" : "system";
      try {
        localStorage.setItem(themeKey, next);
      } catch (_) {}
      apply(next);
    });
    apply(stored());
  }

  document.addEventListener("click", function (e) {
    var a = e.target && e.target.closest ? e.target.closest('a[href^="#"]') : null;
    if (!a) return;
    var id = a.getAttribute("href").slice(1);
    var target = id ? document.getElementById(id) : null;
    if (!target) return;
    e.preventDefault();
    target.scrollIntoView({ behavior: "smooth", block: "start" });
    history.replaceState(null, "", "#" + id);
  });
})();"##;
