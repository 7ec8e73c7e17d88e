//! Asset Bundles
//!
//! Named groups of third-party script files a widget needs on the page.

/// A named set of script files with bundle dependencies
#[derive(Debug)]
pub struct AssetBundle {
    pub name: &'static str,
    pub js: &'static [&'static str],
    pub depends: &'static [&'static AssetBundle],
}

/// jQuery, required by every ready-phase script
pub static JQUERY: AssetBundle = AssetBundle {
    name: "jquery",
    js: &["https://code.jquery.com/jquery-3.7.1.min.js"],
    depends: &[],
};

/// Card input formatting and validation helpers (`$.payment`)
pub static JQUERY_PAYMENT: AssetBundle = AssetBundle {
    name: "jquery.payment",
    js: &["https://cdnjs.cloudflare.com/ajax/libs/jquery.payment/3.0.0/jquery.payment.min.js"],
    depends: &[&JQUERY],
};

impl AssetBundle {
    /// The bundle and its dependencies, dependencies first
    pub fn resolve(&'static self) -> Vec<&'static AssetBundle> {
        let mut ordered = Vec::new();
        self.collect(&mut ordered);
        ordered
    }

    fn collect(&'static self, ordered: &mut Vec<&'static AssetBundle>) {
        if ordered.iter().any(|b| b.name == self.name) {
            return;
        }
        for dependency in self.depends {
            dependency.collect(ordered);
        }
        ordered.push(self);
    }
}
