//! The whole single-page site: loading screen first, then the content
//! sections once the loader has finished its exit.

use std::cell::Cell;
use std::rc::Rc;

use folio_motion_core::{Config, Outputs, Surface, TeardownReport, Viewport};
use log::debug;

use crate::error::Result;
use crate::{
    AboutSection, ContactSection, Footer, HeroSection, LoadingScreen, Navigation,
    ProjectsSection, Section,
};

#[derive(Debug)]
pub struct Page {
    config: Config,
    loaded: Rc<Cell<bool>>,
    loading: LoadingScreen,
    pub navigation: Navigation,
    pub hero: HeroSection,
    pub about: AboutSection,
    pub projects: ProjectsSection,
    pub contact: ContactSection,
    pub footer: Footer,
    viewport: Option<Viewport>,
    /// Outputs of sections unmounted before the host drained them.
    pending: Outputs,
}

impl Page {
    pub fn new(config: Config) -> Self {
        let loaded = Rc::new(Cell::new(false));
        let flag = loaded.clone();
        Self {
            config,
            loaded,
            loading: LoadingScreen::new(move || flag.set(true)),
            navigation: Navigation::new(),
            hero: HeroSection::new(),
            about: AboutSection::new(),
            projects: ProjectsSection::new(),
            contact: ContactSection::new(),
            footer: Footer::new(),
            viewport: None,
            pending: Outputs::default(),
        }
    }

    pub fn loading(&self) -> &LoadingScreen {
        &self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    fn content(&mut self) -> [&mut dyn Section; 6] {
        [
            &mut self.navigation,
            &mut self.hero,
            &mut self.about,
            &mut self.projects,
            &mut self.contact,
            &mut self.footer,
        ]
    }

    /// Start the loading screen.
    pub fn mount(&mut self, surface: &dyn Surface) -> Result<()> {
        let config = self.config.clone();
        self.loading.mount(surface, &config)
    }

    fn mount_content(&mut self, surface: &dyn Surface) -> Result<()> {
        let config = self.config.clone();
        let viewport = self.viewport;
        for section in self.content() {
            section.mount(surface, &config)?;
            if let Some(viewport) = viewport {
                section.scroll(viewport, surface);
            }
        }
        debug!("page content mounted");
        Ok(())
    }

    pub fn update(&mut self, dt_ms: u64, surface: &dyn Surface) -> Result<()> {
        if self.loading.is_mounted() {
            self.loading.update(dt_ms, surface);
            if self.loaded.get() {
                self.pending.extend(self.loading.take_outputs());
                self.loading.unmount();
                self.mount_content(surface)?;
            }
            return Ok(());
        }
        for section in self.content() {
            section.update(dt_ms, surface);
        }
        Ok(())
    }

    pub fn scroll(&mut self, viewport: Viewport, surface: &dyn Surface) {
        self.viewport = Some(viewport);
        for section in self.content() {
            section.scroll(viewport, surface);
        }
    }

    /// Drain every mounted section's outputs, loader first.
    pub fn take_outputs(&mut self) -> Outputs {
        let mut out = std::mem::take(&mut self.pending);
        out.extend(self.loading.take_outputs());
        for section in self.content() {
            out.extend(section.take_outputs());
        }
        out
    }

    pub fn unmount(&mut self) -> TeardownReport {
        let mut total = self.loading.unmount();
        for section in self.content() {
            total.merge(section.unmount());
        }
        total
    }
}
