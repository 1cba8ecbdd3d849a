//! Board-level clock configuration for the STM32F407 target.

/// 168 MHz sysclk from the 8 MHz HSE crystal.
pub fn peripheral_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc;
    use embassy_stm32::time::Hertz;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(rcc::Hse {
        freq: Hertz::mhz(8),
        mode: rcc::HseMode::Oscillator,
    });
    config.rcc.pll_src = rcc::PllSource::HSE;
    config.rcc.pll = Some(rcc::Pll {
        prediv: rcc::PllPreDiv::DIV8,
        mul: rcc::PllMul::MUL336,
        divp: Some(rcc::PllPDiv::DIV2), // 168 MHz sysclk
        divq: Some(rcc::PllQDiv::DIV7), // 48 MHz for USB/SDIO
        divr: None,
    });
    config.rcc.sys = rcc::Sysclk::PLL1_P;
    config.rcc.ahb_pre = rcc::AHBPrescaler::DIV1;
    config.rcc.apb1_pre = rcc::APBPrescaler::DIV4;
    config.rcc.apb2_pre = rcc::APBPrescaler::DIV2;
    config
}
