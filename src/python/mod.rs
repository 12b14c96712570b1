use pyo3::prelude::*;
use pyo3::wrap_pymodule;
use solo_core::python::core;
use solo_optics::python::optics;

#[pymodule]
#[pyo3(name = "_lib")]
fn solo(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_wrapped(wrap_pymodule!(core))?;
    m.add_wrapped(wrap_pymodule!(optics))?;

    for name in ["core", "optics"] {
        register_submodule(m, name)?;
    }

    Ok(())
}

/// Make `solo._lib.<name>` importable with a regular `import` statement
fn register_submodule(m: &Bound<'_, PyModule>, name: &str) -> PyResult<()> {
    let submodule = m.getattr(name)?;
    m.py()
        .import("sys")?
        .getattr("modules")?
        .set_item(format!("solo._lib.{name}"), submodule)
}
