use super::{MetalContext, MetalView};
use crate::{AppConfig, PipelineError, Result, ViewController, ViewDelegate};
use cocoa::{
    appkit::{
        NSApp, NSApplication, NSApplicationActivationPolicy,
        NSBackingStoreType::NSBackingStoreBuffered, NSEvent, NSMenu, NSMenuItem, NSView, NSWindow,
        NSWindowStyleMask,
    },
    base::{id, nil, selector},
    foundation::{NSAutoreleasePool, NSPoint, NSRect, NSSize, NSString},
};
use dispatch::Queue;
use display_link::DisplayLink;
use objc::{
    declare::ClassDecl,
    rc::autoreleasepool,
    runtime::{Object, Sel, BOOL, NO, YES},
};
use std::{
    os::raw::c_void,
    sync::{Arc, Mutex},
};

const ESCAPE_KEY_CODE: u16 = 53;

fn debug_assert_objc_class(
    #[allow(unused_variables)] obj: *mut Object,
    #[allow(unused_variables)] class_name: &'static str,
) -> *mut Object {
    #[cfg(debug_assertions)]
    {
        use objc::runtime::Class;
        let class = Class::get(class_name);
        let result: BOOL = unsafe { msg_send![obj, isKindOfClass: class] };
        debug_assert_eq!(
            result, YES,
            "Expected Objective-C object to be kind of class {class_name}"
        );
    }
    obj
}

struct ApplicationManager<D: ViewDelegate<MetalContext, MetalView> + 'static> {
    controller: ViewController<MetalContext, MetalView, D>,
}

unsafe impl<D: ViewDelegate<MetalContext, MetalView> + 'static> Send for ApplicationManager<D> {}

impl<D: ViewDelegate<MetalContext, MetalView> + 'static> ApplicationManager<D> {
    // Important: Call within `autoreleasepool()`.
    fn from_nswindow(
        nswindow: *mut Object,
        controller: ViewController<MetalContext, MetalView, D>,
    ) -> Result<DisplayLink> {
        let nswindow = debug_assert_objc_class(nswindow, "NSWindow");
        let mut manager = Box::new(Self { controller });
        manager.init_window_event_handlers(nswindow);
        manager.init_and_attach_view(nswindow)?;
        let NSSize { width, height } =
            unsafe { nswindow.contentRectForFrameRect_(nswindow.frame()).size };
        manager.controller.resize([width, height]);

        let manager = Arc::new(Mutex::new(manager));
        let main_queue = Queue::main();
        DisplayLink::new(move |_| {
            let manager = Arc::clone(&manager);
            main_queue.exec_async(move || match manager.lock() {
                Ok(mut manager) => manager.redraw(),
                Err(_) => log::error!("Application state poisoned, skipping frame"),
            });
        })
        .ok_or_else(|| PipelineError::WindowSystem("Could not create display link".to_owned()))
    }

    fn redraw(&mut self) {
        if let Err(error) = self.controller.redraw() {
            log::error!("Skipping frame: {error}");
        }
    }

    fn init_and_attach_view(self: &mut Box<Self>, nswindow: *mut Object) -> Result<()> {
        unsafe {
            let mut decl = ClassDecl::new("PipelineMetalView", class!(NSView)).ok_or_else(|| {
                PipelineError::WindowSystem(
                    "Unable to create custom NSView (PipelineMetalView)".to_owned(),
                )
            })?;
            decl.add_method(sel!(acceptsFirstResponder), {
                extern "C" fn accepts_first_responder(_this: &Object, _sel: Sel) -> BOOL {
                    YES
                }
                accepts_first_responder as extern "C" fn(&Object, Sel) -> BOOL
            });
            decl.add_method(sel!(keyDown:), {
                extern "C" fn on_key_down(_this: &Object, _: Sel, event: *mut Object) {
                    unsafe {
                        let key_code = NSEvent::keyCode(event);
                        if key_code == ESCAPE_KEY_CODE {
                            let () = msg_send![NSApp(), terminate: nil];
                        } else {
                            log::trace!("Ignoring key {key_code}");
                        }
                    }
                }
                on_key_down as extern "C" fn(&Object, Sel, id)
            });
            let viewclass = decl.register();
            let view: id = msg_send![viewclass, alloc];
            let () = msg_send![view, init];
            view.setWantsLayer(YES);
            view.setLayer(self.controller.view().layer() as *const _ as id);
            nswindow.setContentView_(view);
            nswindow.setInitialFirstResponder_(view);
        }
        Ok(())
    }

    fn init_window_event_handlers(self: &mut Box<Self>, nswindow: *mut Object) {
        let manager_ptr: *mut ApplicationManager<D> = &mut **self;

        extern "C" fn on_nswindow_resize<D: ViewDelegate<MetalContext, MetalView> + 'static>(
            this: &Object,
            _: Sel,
            notification: *mut Object,
        ) {
            let NSSize { width, height } = unsafe {
                // The notification's object is the window that resized or became main.
                let nswindow: *mut Object = msg_send![
                    debug_assert_objc_class(notification, "NSNotification"),
                    object
                ];
                nswindow.contentRectForFrameRect_(nswindow.frame()).size
            };
            let manager = unsafe {
                &mut *(*this.get_ivar::<*mut c_void>("applicationManager")
                    as *mut ApplicationManager<D>)
            };
            manager.controller.resize([width, height]);
        }

        unsafe {
            #[allow(non_camel_case_types)]
            type id = cocoa::base::id; // Used by code generated by `delegate!` macro.
            debug_assert_objc_class(nswindow, "NSWindow").setDelegate_(delegate!("PipelineWindowDelegate", {
                applicationManager: *mut c_void = manager_ptr as *mut c_void,
                (windowDidResize:) => on_nswindow_resize::<D> as extern fn(&Object, Sel, *mut Object),
                (windowDidBecomeMain:) => on_nswindow_resize::<D> as extern fn(&Object, Sel, *mut Object)
            }));
        }
    }
}

/// Opens a window hosting a `MetalView`, drives `delegate` from the display's refresh and runs
/// the application's event loop. Only returns early if the window system could not be set up.
///
/// The event loop runs inside the pool that created the window, so the autoreleased window stays
/// alive for as long as `app.run()` does.
pub fn launch_application<D: ViewDelegate<MetalContext, MetalView> + 'static>(
    config: &AppConfig,
    context: MetalContext,
    delegate: D,
) -> Result<()> {
    autoreleasepool(|| -> Result<()> {
        unsafe {
            let app = NSApp();
            app.setActivationPolicy_(
                NSApplicationActivationPolicy::NSApplicationActivationPolicyRegular,
            );
            app.setMainMenu_({
                let menubar = NSMenu::new(nil).autorelease();
                menubar.addItem_({
                    let menu_item = NSMenuItem::new(nil).autorelease();
                    let menu = NSMenu::new(nil).autorelease();
                    menu.addItem_(
                        NSMenuItem::alloc(nil)
                            .initWithTitle_action_keyEquivalent_(
                                NSString::alloc(nil)
                                    .init_str(&format!("Quit {}", config.title))
                                    .autorelease(),
                                selector("terminate:"),
                                NSString::alloc(nil).init_str("q").autorelease(),
                            )
                            .autorelease(),
                    );
                    menu_item.setSubmenu_(menu);
                    menu_item
                });
                menubar
            });

            let [width, height] = config.window_size;
            let window = NSWindow::alloc(nil)
                .initWithContentRect_styleMask_backing_defer_(
                    NSRect::new(NSPoint::new(0., 0.), NSSize::new(width, height)),
                    NSWindowStyleMask::NSClosableWindowMask
                        | NSWindowStyleMask::NSTitledWindowMask
                        | NSWindowStyleMask::NSMiniaturizableWindowMask
                        | NSWindowStyleMask::NSResizableWindowMask,
                    NSBackingStoreBuffered,
                    YES,
                )
                .autorelease();
            window.setPreservesContentDuringLiveResize_(NO);
            window.setTitle_(NSString::alloc(nil).init_str(&config.title).autorelease());
            window.center();
            window.makeKeyAndOrderFront_(nil);

            let view = MetalView::new(&context, &config.renderer, window.backingScaleFactor());
            let controller = ViewController::new(context, view, delegate);
            let mut link = ApplicationManager::from_nswindow(window, controller)?;
            app.activateIgnoringOtherApps_(YES);
            link.resume().map_err(|e| {
                PipelineError::WindowSystem(format!("Could not start display link: {e:?}"))
            })?;
            log::debug!("Running application event loop");
            app.run();
            Ok(())
        }
    })
}
