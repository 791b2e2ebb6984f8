#![no_std]
#![no_main]

use core::panic::PanicInfo;

/// This function is called on panic.
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

#[no_mangle]
pub extern "C" fn _start() -> ! {
    let ctx = rohc_tcp_opts::OptionsContext::<()>::default();
    let accepted = rohc_tcp_opts::accept(&[0x01]).unwrap();
    let _ = rohc_tcp_opts::detect_changes(&ctx, &accepted, false, 3);

    loop {}
}
